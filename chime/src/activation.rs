//! Activation token hand-off for focus-stealing prevention.
//!
//! Compositors that implement the xdg-activation protocol grant a token
//! alongside a notification action. The token must be visible to whatever
//! window-raising code runs next, and the conventional channel for that is
//! the process environment.

/// Environment variable read by toolkits when mapping a window.
pub const XDG_ACTIVATION_TOKEN: &str = "XDG_ACTIVATION_TOKEN";

/// Where activation tokens are published before a host callback runs.
pub trait ActivationEnv {
    fn put_token(&mut self, token: &str);
    fn clear_token(&mut self);
}

/// Publishes tokens through the real process environment.
#[derive(Debug, Default)]
pub struct ProcessEnv;

impl ActivationEnv for ProcessEnv {
    fn put_token(&mut self, token: &str) {
        // Sound only because the runtime task is the sole writer and no
        // other thread reads the environment while a callback is in flight.
        unsafe { std::env::set_var(XDG_ACTIVATION_TOKEN, token) };
    }

    fn clear_token(&mut self) {
        unsafe { std::env::remove_var(XDG_ACTIVATION_TOKEN) };
    }
}
