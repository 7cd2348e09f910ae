use crate::{PresenceMessage, Result};

/// A broadcast channel shared by every instance of the application.
///
/// Messages sent here fan out to all peers but are never echoed back to
/// the sender.
pub trait PresenceChannel {
    fn send(&mut self, msg: PresenceMessage) -> Result<()>;

    /// Drain the next message from a peer, if any.
    fn poll(&mut self) -> Option<PresenceMessage>;
}
