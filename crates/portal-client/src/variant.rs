//! Conversions between our payload/identity types and D-Bus variants.

use chime_registry::WireValue;
use zbus::zvariant::{Array, OwnedValue, SerializeDict, Signature, StructureBuilder, Type, Value};

use crate::payload::{IconRef, ShowPayload};

/// One notification in the `a{sv}` shape the portal accepts. Optional
/// entries are omitted from the dict when `None`.
#[derive(Debug, SerializeDict, Type)]
#[zvariant(signature = "dict")]
pub(crate) struct PortalNotification {
    title: String,
    body: String,
    icon: Option<OwnedValue>,
    priority: String,
    category: Option<String>,
    #[zvariant(rename = "default-action")]
    default_action: String,
    #[zvariant(rename = "default-action-target")]
    default_action_target: Option<OwnedValue>,
    buttons: Option<Vec<PortalButton>>,
}

#[derive(Debug, SerializeDict, Type)]
#[zvariant(signature = "dict")]
pub(crate) struct PortalButton {
    label: String,
    action: String,
    target: Option<OwnedValue>,
}

pub(crate) fn notification(
    payload: &ShowPayload,
) -> Result<PortalNotification, zbus::zvariant::Error> {
    let buttons = if payload.buttons.is_empty() {
        None
    } else {
        let mut out = Vec::with_capacity(payload.buttons.len());
        for button in &payload.buttons {
            out.push(PortalButton {
                label: button.label.clone(),
                action: button.action.clone(),
                target: Some(sequence_value(&button.target)?),
            });
        }
        Some(out)
    };

    Ok(PortalNotification {
        title: payload.title.clone(),
        body: payload.body.clone(),
        icon: Some(icon_value(&payload.icon)?),
        priority: payload.priority.as_str().to_string(),
        category: payload.category.clone(),
        default_action: payload.default_action.clone(),
        default_action_target: Some(sequence_value(&payload.default_action_target)?),
        buttons,
    })
}

/// Icons travel as a `(sv)` pair naming the source kind: themed icon names
/// as a string array, prerendered images as raw bytes.
fn icon_value(icon: &IconRef) -> Result<OwnedValue, zbus::zvariant::Error> {
    let (kind, data) = match icon {
        IconRef::Themed(name) => ("themed", Value::Array(Array::from(vec![name.clone()]))),
        IconRef::Bytes(bytes) => ("bytes", Value::Array(Array::from(bytes.clone()))),
    };
    let structure = StructureBuilder::new()
        .add_field(kind.to_string())
        .append_field(Value::Value(Box::new(data)))
        .build();
    Ok(Value::Structure(structure).into())
}

/// An action target: the identity sequence as an `av`, variant-wrapped for
/// the enclosing dict.
fn sequence_value(values: &[WireValue]) -> Result<OwnedValue, zbus::zvariant::Error> {
    Ok(Value::Array(sequence_array(values)?).into())
}

fn sequence_array(values: &[WireValue]) -> Result<Array<'static>, zbus::zvariant::Error> {
    let mut array = Array::new(Signature::from_static_str_unchecked("v"));
    for value in values {
        array.append(Value::Value(Box::new(scalar_value(value)?)))?;
    }
    Ok(array)
}

fn scalar_value(value: &WireValue) -> Result<Value<'static>, zbus::zvariant::Error> {
    Ok(match value {
        WireValue::Unsigned(v) => Value::U64(*v),
        WireValue::Signed(v) => Value::I64(*v),
        WireValue::Sequence(values) => Value::Array(sequence_array(values)?),
    })
}

/// Decodes an inbound action-target sequence. Members outside the supported
/// tag set are skipped, not errors; peers may attach extra data.
pub(crate) fn decode_sequence(values: &[OwnedValue]) -> Vec<WireValue> {
    values
        .iter()
        .filter_map(|value| decode_value(value))
        .collect()
}

fn decode_value(value: &Value<'_>) -> Option<WireValue> {
    match value {
        Value::U64(v) => Some(WireValue::Unsigned(*v)),
        Value::I64(v) => Some(WireValue::Signed(*v)),
        Value::Value(inner) => decode_value(inner),
        Value::Array(array) => Some(WireValue::Sequence(
            array.get().iter().filter_map(decode_value).collect(),
        )),
        _ => None,
    }
}
