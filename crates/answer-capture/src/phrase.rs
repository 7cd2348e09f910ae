//! The spoken command protocol.
//!
//! "my answer" opens the answer window; "this is my answer" closes it. Both
//! phrases are matched ASCII-case-insensitively and anchor on their *last*
//! occurrence: a repeated start phrase re-anchors the candidate, and the
//! final end phrase wins. Because the end phrase contains the start phrase,
//! the committed answer is the text strictly between the last start phrase
//! occurring *before* the last end phrase; an end phrase with no start
//! phrase before it is ignored.

/// Phrase that switches the controller into capturing mode.
pub const START_PHRASE: &str = "my answer";

/// Phrase that commits the captured answer.
pub const END_PHRASE: &str = "this is my answer";

/// Result of scanning a transcript while capturing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No end phrase yet; carries the live answer candidate.
    Incomplete(String),
    /// End phrase found; carries the final answer text.
    Committed(String),
}

/// Find the last ASCII-case-insensitive occurrence of `needle` whose match
/// ends at or before `limit`.
///
/// Needles are ASCII, so any byte-level match necessarily starts and ends
/// on a char boundary.
fn rfind_ignore_ascii_case(haystack: &str, needle: &str, limit: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    let limit = limit.min(h.len());
    if n.is_empty() || limit < n.len() {
        return None;
    }
    (0..=limit - n.len())
        .rev()
        .find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Whether the transcript contains the start phrase anywhere.
pub fn contains_start(transcript: &str) -> bool {
    rfind_ignore_ascii_case(transcript, START_PHRASE, transcript.len()).is_some()
}

/// Scan a transcript that is already in capturing mode.
///
/// If the transcript holds an end phrase with a start phrase before it, the
/// answer between the last such pair is committed. Otherwise the live
/// candidate is everything after the last start phrase; a transcript with
/// no start phrase at all (cleared buffer, stale event) yields an empty
/// candidate.
pub fn scan_capturing(transcript: &str) -> ScanOutcome {
    if let Some(end_idx) = rfind_ignore_ascii_case(transcript, END_PHRASE, transcript.len()) {
        if let Some(start_idx) = rfind_ignore_ascii_case(transcript, START_PHRASE, end_idx) {
            let answer = transcript[start_idx + START_PHRASE.len()..end_idx].trim();
            return ScanOutcome::Committed(answer.to_string());
        }
        // End phrase before any start phrase: not a command, fall through.
    }
    let candidate = match rfind_ignore_ascii_case(transcript, START_PHRASE, transcript.len()) {
        Some(idx) => transcript[idx + START_PHRASE.len()..].trim(),
        None => "",
    };
    ScanOutcome::Incomplete(candidate.to_string())
}
