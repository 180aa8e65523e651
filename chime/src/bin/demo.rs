//! Headless demo — drives the notifier against the real session bus.
//!
//! Shows a handful of notifications across two simulated account sessions,
//! clears one conversation, then prints user interactions as JSON lines
//! until Ctrl+C.

use tracing_subscriber::EnvFilter;

use chime::activation::ProcessEnv;
use chime::config;
use chime::service;
use chime::{ContextId, DisplayOptions, Manager, MsgId, NotifierConfig, ShowRequest};
use portal_client::PortalClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Step 1: Tracing + configuration
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    config::load_dotenv();
    let config = NotifierConfig::load();

    // Step 2: Notification portal
    let (backend, inbound) = PortalClient::connect().await?;

    // Step 3: Notifier runtime
    let manager = Manager::new(backend, config.clone());
    let (notifier, mut events, cancel) = service::start(manager, inbound, ProcessEnv, &config);

    // Step 4: Sample traffic — two sessions, one replace, one history clear
    let show = |session, peer, msg, subtitle: &str, body: &str| {
        notifier.show(ShowRequest {
            context: ContextId::new(session, peer, 0),
            msg_id: MsgId(msg),
            title: "Rustaceans".into(),
            subtitle: subtitle.into(),
            body: body.into(),
            userpic: None,
            options: DisplayOptions::default(),
        });
    };
    show(1, 100, 5, "Alice", "the borrow checker is right again");
    show(1, 100, 5, "Alice", "the borrow checker is right again (edited)");
    show(1, 200, 6, "Bob", "lunch?");
    show(2, 100, 7, "Carol", "second account says hi");
    notifier.clear_from_history(1, 200);

    tracing::info!("Demo running. Interact with the notifications; Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Some(event) => println!("{}", serde_json::to_string(&event)?),
                None => break,
            },
        }
    }

    tracing::info!("Shutting down...");
    cancel.cancel();
    Ok(())
}
