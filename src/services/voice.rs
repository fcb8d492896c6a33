//! Voice I/O controller: coordinates speech capture and playback with the
//! conversation loop as an explicit state machine.
//!
//! Capture (`Idle ⇄ Listening`) and playback (`Idle ⇄ Speaking`) run
//! independently, but each side is at-most-one: starting a capture while
//! listening stops it instead (toggle semantics), and every `speak` cancels
//! any in-flight utterance first. Platform speech APIs sit behind the
//! [`SpeechRecognizer`] and [`SpeechSynthesizer`] traits; where a platform
//! has neither, the no-op stubs keep the feature silently disabled.

use color_eyre::Result;
use reqwest::blocking::Client;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Platform speech-to-text seam. Implementations run a single,
/// non-continuous capture session; results and session-end signals are fed
/// back through the controller's `on_*` methods by the host.
pub trait SpeechRecognizer {
    fn start(&mut self, language: &str) -> Result<()>;
    fn stop(&mut self);
    fn is_supported(&self) -> bool {
        true
    }
}

/// Platform text-to-speech seam.
pub trait SpeechSynthesizer {
    fn speak(&self, text: &str) -> Result<()>;
    fn stop(&self);
    fn is_supported(&self) -> bool {
        true
    }
}

/// Stub for platforms without speech recognition; the feature is disabled,
/// never an error.
pub struct NoopRecognizer;

impl SpeechRecognizer for NoopRecognizer {
    fn start(&mut self, _language: &str) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn is_supported(&self) -> bool {
        false
    }
}

/// Stub for platforms without speech synthesis.
pub struct NoopSynthesizer;

impl SpeechSynthesizer for NoopSynthesizer {
    fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn stop(&self) {}

    fn is_supported(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Idle,
    Listening,
}

pub struct VoiceController {
    recognizer: Box<dyn SpeechRecognizer>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    capture: CaptureState,
    pending_transcript: Option<String>,
    speaking_id: Option<u64>,
}

impl VoiceController {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            capture: CaptureState::Idle,
            pending_transcript: None,
            speaking_id: None,
        }
    }

    #[must_use]
    pub fn speech_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    #[must_use]
    pub fn tts_supported(&self) -> bool {
        self.synthesizer.is_supported()
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.capture == CaptureState::Listening
    }

    /// Toggle semantics: starting while already listening requests a stop
    /// instead. A no-op where recognition is unsupported.
    pub fn toggle_listening(&mut self, language: &str) -> Result<()> {
        match self.capture {
            CaptureState::Listening => {
                self.recognizer.stop();
                Ok(())
            }
            CaptureState::Idle => {
                if !self.recognizer.is_supported() {
                    return Ok(());
                }
                self.recognizer.start(language)?;
                self.capture = CaptureState::Listening;
                Ok(())
            }
        }
    }

    /// Platform callback: a final transcript arrived. Buffered until the
    /// session ends, since platforms may emit result and end in either order.
    pub fn on_transcript(&mut self, transcript: &str) {
        self.pending_transcript = Some(transcript.to_string());
    }

    /// Platform callback: the capture session ended. Returns the buffered
    /// transcript for the session facade to send as a voice message.
    pub fn on_capture_end(&mut self) -> Option<String> {
        self.capture = CaptureState::Idle;
        self.pending_transcript.take()
    }

    /// Platform callback: capture failed. Silent reset; the user retries.
    pub fn on_capture_error(&mut self) {
        debug!("speech capture error, resetting");
        self.capture = CaptureState::Idle;
        self.pending_transcript = None;
    }

    /// Speaks `text`, cancelling any in-flight utterance first. Markup is
    /// stripped before synthesis; `message_id` is tracked for UI highlighting.
    pub fn speak(&mut self, text: &str, message_id: u64) -> Result<()> {
        if !self.synthesizer.is_supported() {
            return Ok(());
        }
        self.synthesizer.stop();
        self.synthesizer.speak(&strip_markup(text))?;
        self.speaking_id = Some(message_id);
        Ok(())
    }

    /// Cancels synthesis immediately. Idempotent: calling with nothing
    /// speaking is a no-op.
    pub fn stop_speaking(&mut self) {
        self.synthesizer.stop();
        self.speaking_id = None;
    }

    #[must_use]
    pub fn speaking_message(&self) -> Option<u64> {
        self.speaking_id
    }
}

/// Strips lightweight markdown before synthesis: bold/italic/code/heading
/// markers disappear and `[label](url)` links collapse to their label.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    collapse_links(text)
        .chars()
        .filter(|c| !matches!(c, '*' | '`' | '#'))
        .collect()
}

fn collapse_links(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while let Some(&current) = chars.get(i) {
        if current == '[' {
            let close = (i + 1..chars.len()).find(|&j| {
                chars.get(j) == Some(&']') && chars.get(j + 1) == Some(&'(')
            });
            if let Some(j) = close {
                if let Some(k) = (j + 2..chars.len()).find(|&k| chars.get(k) == Some(&')')) {
                    if let Some(label) = chars.get(i + 1..j) {
                        out.extend(label);
                    }
                    i = k + 1;
                    continue;
                }
            }
        }
        out.push(current);
        i += 1;
    }

    out
}

/// Text-to-speech via the ElevenLabs API with rodio playback. Playback runs
/// on a background thread holding the sink; `stop` takes the sink out from
/// under it.
pub struct ElevenLabsSynthesizer {
    api_key: String,
    voice_id: String,
    model: String,
    // Detected once at construction, not per call.
    supported: bool,
    client: Client,
    current_sink: Arc<Mutex<Option<Arc<Sink>>>>,
}

impl ElevenLabsSynthesizer {
    #[must_use]
    pub fn new(api_key: String, voice_id: String, model: String) -> Self {
        let supported = !api_key.is_empty() && api_key != "your_api_key_here";
        if !supported {
            warn!("ElevenLabs API key not configured, speech synthesis disabled");
        }
        Self {
            api_key,
            voice_id,
            model,
            supported,
            client: Client::new(),
            current_sink: Arc::new(Mutex::new(None)),
        }
    }

    fn play_audio(&self, audio_data: Vec<u8>) {
        self.stop();

        let current_sink = Arc::clone(&self.current_sink);
        std::thread::spawn(move || {
            let (_stream, stream_handle) = OutputStream::try_default().ok()?;
            let sink = Arc::new(Sink::try_new(&stream_handle).ok()?);

            if let Ok(mut sink_guard) = current_sink.lock() {
                *sink_guard = Some(Arc::clone(&sink));
            }

            if let Ok(source) = Decoder::new(Cursor::new(audio_data)) {
                sink.append(source);
                sink.sleep_until_end();
            }

            if let Ok(mut sink_guard) = current_sink.lock() {
                *sink_guard = None;
            }
            Some(())
        });
    }
}

impl SpeechSynthesizer for ElevenLabsSynthesizer {
    fn speak(&self, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "text": text,
            "model_id": self.model,
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.5
            }
        });

        let response = self
            .client
            .post(format!(
                "https://api.elevenlabs.io/v1/text-to-speech/{}",
                self.voice_id
            ))
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?
            .error_for_status()?;

        let audio_data = response.bytes()?.to_vec();
        self.play_audio(audio_data);
        Ok(())
    }

    fn stop(&self) {
        if let Ok(mut sink_guard) = self.current_sink.lock()
            && let Some(sink) = sink_guard.take()
        {
            sink.stop();
        }
    }

    fn is_supported(&self) -> bool {
        self.supported
    }
}
