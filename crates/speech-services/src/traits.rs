use crate::{Result, TranscriptionEvent};

/// A text-to-speech service returning encoded audio.
///
/// The payload is base64 PCM16-LE at [`crate::NARRATION_SAMPLE_RATE_HZ`],
/// mono. One request per call; callers treat failures as non-fatal and
/// retry only by explicit replay.
pub trait NarrationService {
    fn synthesize(&mut self, text: &str) -> Result<String>;
}

/// A continuous speech-to-text stream.
///
/// Implementations are polled; they never invoke callbacks.
pub trait TranscriptionStream {
    /// Start (or restart) the stream. Starting a stream that is already
    /// active or starting is a silent no-op, so racing restarts are safe.
    fn start(&mut self) -> Result<()>;

    /// Stop the stream. Safe to call when already stopped.
    fn stop(&mut self);

    fn is_active(&self) -> bool;

    /// Drain the next pending event, if any.
    fn poll(&mut self) -> Option<TranscriptionEvent>;
}

/// An audio output sink, created lazily on the first user gesture and
/// reused for the whole session.
pub trait AudioSink {
    /// Resume the sink if suspended. Called before every play.
    fn resume(&mut self) -> Result<()>;

    /// Start playing `samples`, replacing (never overlapping) any source
    /// that is currently playing.
    fn play(&mut self, samples: &[f32], sample_rate_hz: u32) -> Result<()>;

    /// Stop and discard the current source, if any.
    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Reports `true` exactly once when playback finished naturally.
    /// Playback cut short by [`AudioSink::stop`] never reports completion.
    fn poll_ended(&mut self) -> bool;
}

/// A session recorder for the camera/microphone stream.
///
/// The recorder shares the media stream read-only; it must not terminate
/// the underlying tracks. That is session teardown's job.
pub trait MediaRecorder {
    /// Begin recording. Failure here is fatal to session start.
    fn start(&mut self) -> Result<()>;

    /// Stop recording. Safe to call when not recording.
    fn stop(&mut self);

    fn is_recording(&self) -> bool;
}
