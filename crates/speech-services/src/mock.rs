use crate::{
    pcm, NarrationConfig, NarrationService, Result, SpeechError, TranscriptionEvent,
    TranscriptionStream,
};
use crate::{AudioSink, MediaRecorder};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// All mocks share their state behind Arc<Mutex<..>> and implement Clone, so
// a test or demo can keep a control handle while the component under test
// owns the other clone.

/// Deterministic narration backend: synthesizes a short tone whose length
/// tracks the text length, encoded the same way the real service frames it.
#[derive(Clone)]
pub struct MockNarration {
    cfg: NarrationConfig,
    fail_next: Arc<Mutex<bool>>,
}

impl MockNarration {
    pub fn new(cfg: NarrationConfig) -> Self {
        Self {
            cfg,
            fail_next: Arc::new(Mutex::new(false)),
        }
    }

    /// Make the next `synthesize` call fail, for error-path tests.
    pub fn fail_next_request(&self) {
        if let Ok(mut f) = self.fail_next.lock() {
            *f = true;
        }
    }
}

impl Default for MockNarration {
    fn default() -> Self {
        Self::new(NarrationConfig::default())
    }
}

impl NarrationService for MockNarration {
    fn synthesize(&mut self, text: &str) -> Result<String> {
        let fail = self
            .fail_next
            .lock()
            .map(|mut f| std::mem::take(&mut *f))
            .unwrap_or(false);
        if fail {
            return Err(SpeechError::Service("mock narration failure".to_string()));
        }
        let sr = self.cfg.sample_rate_hz.max(8_000);
        let dur_s = (text.len() as f32 / 40.0).clamp(0.1, 1.0);
        let frames = (sr as f32 * dur_s) as usize;
        let samples: Vec<f32> = (0..frames)
            .map(|n| {
                let t = n as f32 / sr as f32;
                (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.1
            })
            .collect();
        Ok(pcm::encode_pcm16(&samples))
    }
}

#[derive(Default)]
struct TranscriptionInner {
    active: bool,
    events: VecDeque<TranscriptionEvent>,
    start_count: u32,
}

/// Scripted transcription stream. Tests and demos push events through a
/// cloned handle; the controller under test polls them out.
#[derive(Clone, Default)]
pub struct MockTranscription {
    inner: Arc<Mutex<TranscriptionInner>>,
}

impl MockTranscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a cumulative transcript-so-far observation.
    pub fn push_transcript(&self, text: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner
                .events
                .push_back(TranscriptionEvent::Transcript(text.into()));
        }
    }

    pub fn push_error(&self, kind: crate::TranscriptionErrorKind) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.events.push_back(TranscriptionEvent::Error(kind));
        }
    }

    /// Simulate the provider ending the stream on its own.
    pub fn end_stream(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.active = false;
            inner.events.push_back(TranscriptionEvent::Ended);
        }
    }

    /// Number of times `start` actually (re)started the stream.
    pub fn start_count(&self) -> u32 {
        self.inner.lock().map(|i| i.start_count).unwrap_or(0)
    }
}

impl TranscriptionStream for MockTranscription {
    fn start(&mut self) -> Result<()> {
        if let Ok(mut inner) = self.inner.lock() {
            if !inner.active {
                inner.active = true;
                inner.start_count += 1;
            }
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.active = false;
        }
    }

    fn is_active(&self) -> bool {
        self.inner.lock().map(|i| i.active).unwrap_or(false)
    }

    fn poll(&mut self) -> Option<TranscriptionEvent> {
        self.inner.lock().ok().and_then(|mut i| i.events.pop_front())
    }
}

#[derive(Default)]
struct SinkInner {
    playing: bool,
    ended_pending: bool,
    suspended: bool,
    plays: Vec<(usize, u32)>,
    stops: u32,
    resumes: u32,
}

/// In-memory audio sink recording what was played. `finish` on a cloned
/// handle simulates the current source reaching its natural end.
#[derive(Clone, Default)]
pub struct MockSink {
    inner: Arc<Mutex<SinkInner>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suspended() -> Self {
        let sink = Self::default();
        if let Ok(mut inner) = sink.inner.lock() {
            inner.suspended = true;
        }
        sink
    }

    /// Simulate the current source reaching its natural end.
    pub fn finish(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            if inner.playing {
                inner.playing = false;
                inner.ended_pending = true;
            }
        }
    }

    pub fn play_count(&self) -> usize {
        self.inner.lock().map(|i| i.plays.len()).unwrap_or(0)
    }

    pub fn last_play(&self) -> Option<(usize, u32)> {
        self.inner.lock().ok().and_then(|i| i.plays.last().copied())
    }

    pub fn stop_count(&self) -> u32 {
        self.inner.lock().map(|i| i.stops).unwrap_or(0)
    }

    pub fn resume_count(&self) -> u32 {
        self.inner.lock().map(|i| i.resumes).unwrap_or(0)
    }
}

impl AudioSink for MockSink {
    fn resume(&mut self) -> Result<()> {
        if let Ok(mut inner) = self.inner.lock() {
            inner.suspended = false;
            inner.resumes += 1;
        }
        Ok(())
    }

    fn play(&mut self, samples: &[f32], sample_rate_hz: u32) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| SpeechError::Sink("sink state poisoned".to_string()))?;
        if inner.suspended {
            return Err(SpeechError::Sink("sink is suspended".to_string()));
        }
        if inner.playing {
            // Replacing counts as an explicit stop of the old source.
            inner.stops += 1;
        }
        inner.plays.push((samples.len(), sample_rate_hz));
        inner.playing = true;
        inner.ended_pending = false;
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            if inner.playing {
                inner.stops += 1;
            }
            inner.playing = false;
            inner.ended_pending = false;
        }
    }

    fn is_playing(&self) -> bool {
        self.inner.lock().map(|i| i.playing).unwrap_or(false)
    }

    fn poll_ended(&mut self) -> bool {
        self.inner
            .lock()
            .map(|mut i| std::mem::take(&mut i.ended_pending))
            .unwrap_or(false)
    }
}

#[derive(Default)]
struct RecorderInner {
    recording: bool,
    fail_start: bool,
    starts: u32,
    stops: u32,
}

/// Recorder stub with an optional scripted start failure.
#[derive(Clone, Default)]
pub struct MockRecorder {
    inner: Arc<Mutex<RecorderInner>>,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let rec = Self::default();
        if let Ok(mut inner) = rec.inner.lock() {
            inner.fail_start = true;
        }
        rec
    }

    pub fn start_count(&self) -> u32 {
        self.inner.lock().map(|i| i.starts).unwrap_or(0)
    }

    pub fn stop_count(&self) -> u32 {
        self.inner.lock().map(|i| i.stops).unwrap_or(0)
    }
}

impl MediaRecorder for MockRecorder {
    fn start(&mut self) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| SpeechError::Recorder("recorder state poisoned".to_string()))?;
        if inner.fail_start {
            return Err(SpeechError::Recorder(
                "mock recorder start failure".to_string(),
            ));
        }
        inner.recording = true;
        inner.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            if inner.recording {
                inner.stops += 1;
            }
            inner.recording = false;
        }
    }

    fn is_recording(&self) -> bool {
        self.inner.lock().map(|i| i.recording).unwrap_or(false)
    }
}
