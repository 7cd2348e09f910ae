use crate::{EnvironmentSignal, PresenceChannel, PresenceMessage, Violation, ViolationKind};
use tracing::{debug, warn};

type ViolationCallback = Box<dyn FnMut(&Violation) + Send>;

/// Channel-free edge detection over environment signals.
///
/// Tracks the last seen visibility and fullscreen state and reports a
/// violation kind only on a degrading transition, so held state never
/// floods. The session orchestrator embeds one of these directly; the
/// full [`ProctorMonitor`] adds the presence channel and callback on top.
#[derive(Debug, Default)]
pub struct ViolationDetector {
    hidden: bool,
    fullscreen: bool,
}

impl ViolationDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the violation this transition raises, if any.
    pub fn observe(&mut self, signal: EnvironmentSignal) -> Option<ViolationKind> {
        match signal {
            EnvironmentSignal::VisibilityChanged { hidden } => {
                let raised = hidden && !self.hidden;
                self.hidden = hidden;
                raised.then_some(ViolationKind::TabHidden)
            }
            EnvironmentSignal::FullscreenChanged { fullscreen } => {
                let raised = self.fullscreen && !fullscreen;
                self.fullscreen = fullscreen;
                raised.then_some(ViolationKind::FullscreenExited)
            }
            EnvironmentSignal::FocusGained => None,
        }
    }
}

/// Edge-triggered environment monitor.
///
/// Raises each violation at most once per discrete occurrence: a tab that
/// stays hidden or a session that stays out of fullscreen produces no
/// further violations until the state recovers and degrades again.
pub struct ProctorMonitor<C: PresenceChannel> {
    channel: C,
    callback: Option<ViolationCallback>,
    active: bool,
    edges: ViolationDetector,
    duplicate_session: bool,
}

impl<C: PresenceChannel> ProctorMonitor<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            callback: None,
            active: false,
            edges: ViolationDetector::new(),
            duplicate_session: false,
        }
    }

    /// Begin monitoring and probe the presence channel for peers.
    pub fn start<F>(&mut self, on_violation: F)
    where
        F: FnMut(&Violation) + Send + 'static,
    {
        self.callback = Some(Box::new(on_violation));
        self.active = true;
        self.probe();
    }

    /// Begin monitoring without a callback; violations are still returned
    /// from [`ProctorMonitor::observe`].
    pub fn start_silent(&mut self) {
        self.callback = None;
        self.active = true;
        self.probe();
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.callback = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed one environment transition. Returns the violation it raised,
    /// if any; the registered callback sees it too.
    pub fn observe(&mut self, signal: EnvironmentSignal) -> Option<Violation> {
        if !self.active {
            return None;
        }
        if signal == EnvironmentSignal::FocusGained {
            self.probe();
        }
        self.edges.observe(signal).map(|kind| self.raise(kind))
    }

    /// Drain peer messages. Any traffic means another instance is open;
    /// pings are answered so the peer learns about us as well.
    pub fn poll_channel(&mut self) {
        if !self.active {
            return;
        }
        while let Some(msg) = self.channel.poll() {
            self.duplicate_session = true;
            if msg == PresenceMessage::Ping {
                if let Err(e) = self.channel.send(PresenceMessage::Ack) {
                    warn!(error = %e, "presence ack failed");
                }
            }
        }
    }

    /// Advisory flag: another instance answered the last probe. Blocks the
    /// start affordance upstream; never a strike by itself.
    pub fn duplicate_session_detected(&self) -> bool {
        self.duplicate_session
    }

    /// Re-probe: clear the flag and ping; any reply re-raises it.
    fn probe(&mut self) {
        self.duplicate_session = false;
        if let Err(e) = self.channel.send(PresenceMessage::Ping) {
            warn!(error = %e, "presence probe failed");
        }
    }

    fn raise(&mut self, kind: ViolationKind) -> Violation {
        let violation = Violation::now(kind);
        debug!(?kind, "proctoring violation");
        if let Some(cb) = self.callback.as_mut() {
            cb(&violation);
        }
        violation
    }
}
