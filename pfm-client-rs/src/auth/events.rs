//! Session lifecycle notifications.

/// Broadcast whenever the session changes.
///
/// `LoginRequired` replaces a hard navigation to the login screen: the host
/// application subscribes and decides how to send the user back to sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A credential pair was stored by `set_auth` or a login call.
    Authenticated,
    /// The pair was rotated through the renewal endpoint.
    Renewed,
    /// Renewal failed and credentials were purged.
    LoginRequired { reason: String },
    /// Credentials were cleared on request.
    SignedOut,
}

/// Capacity of the event channel. Slow receivers observe `Lagged`.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 16;
