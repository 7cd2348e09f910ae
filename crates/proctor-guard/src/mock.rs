use crate::{PresenceChannel, PresenceMessage, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Inbox = Arc<Mutex<VecDeque<PresenceMessage>>>;

/// In-process loopback presence channel.
///
/// [`MockPresenceChannel::pair`] yields two connected endpoints simulating
/// two instances of the application sharing one broadcast channel; messages
/// are delivered to the peer only, never echoed to the sender.
pub struct MockPresenceChannel {
    inbox: Inbox,
    peer_inbox: Inbox,
}

impl MockPresenceChannel {
    pub fn pair() -> (Self, Self) {
        let a: Inbox = Arc::new(Mutex::new(VecDeque::new()));
        let b: Inbox = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                inbox: Arc::clone(&a),
                peer_inbox: Arc::clone(&b),
            },
            Self {
                inbox: b,
                peer_inbox: a,
            },
        )
    }
}

impl PresenceChannel for MockPresenceChannel {
    fn send(&mut self, msg: PresenceMessage) -> Result<()> {
        if let Ok(mut q) = self.peer_inbox.lock() {
            q.push_back(msg);
        }
        Ok(())
    }

    fn poll(&mut self) -> Option<PresenceMessage> {
        self.inbox.lock().ok().and_then(|mut q| q.pop_front())
    }
}
