pub mod transcript;
pub mod types;

use crate::agents::AgentManager;
use crate::app::transcript::Transcript;
use crate::app::types::{
    ASPECT_RATIOS, GeneratedImage, language_by_code, Message, STYLE_PRESETS,
};
use crate::services::chatbot;
use crate::services::voice::VoiceController;
use tracing::warn;

const DEFAULT_LANGUAGE: &str = "id-ID";

/// The conversation session: one facade over the transcript, the reply
/// pipeline, and voice I/O. All UI surfaces drive the assistant through
/// this type; nothing below it knows about widgets or rendering.
pub struct ChatSession {
    transcript: Transcript,
    agent: Option<AgentManager>,
    voice: VoiceController,
    language: String,
    pending: bool,
    unread: bool,
    widget_open: bool,
}

impl ChatSession {
    pub fn new(
        transcript: Transcript,
        agent: Option<AgentManager>,
        voice: VoiceController,
    ) -> Self {
        let language = transcript
            .load_language()
            .filter(|code| language_by_code(code).is_some())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        Self {
            transcript,
            agent,
            voice,
            language,
            pending: false,
            unread: false,
            widget_open: false,
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    #[must_use]
    pub fn saved_messages(&self) -> &[Message] {
        self.transcript.saved()
    }

    #[must_use]
    pub fn gallery(&self) -> &[GeneratedImage] {
        self.transcript.gallery()
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn has_unread(&self) -> bool {
        self.unread
    }

    #[must_use]
    pub fn is_widget_open(&self) -> bool {
        self.widget_open
    }

    #[must_use]
    pub fn voice(&self) -> &VoiceController {
        &self.voice
    }

    /// Sends one user turn and appends the assistant's reply. Returns the
    /// assistant message id, or `None` for blank input or when a previous
    /// turn is still pending.
    pub fn send_message(&mut self, text: &str, is_voice: bool) -> Option<u64> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.pending {
            return None;
        }

        self.transcript.append_user(trimmed, is_voice);
        self.pending = true;

        // The transcript already ends with the new user message; the model
        // context is everything before it.
        let reply = match (&self.agent, self.transcript.messages().split_last()) {
            (Some(agent), Some((_, prior))) => agent.chat(prior, trimmed),
            _ => crate::agents::AssistantReply {
                text: chatbot::respond(trimmed),
                image: None,
                image_prompt: None,
            },
        };

        self.pending = false;
        let id = self.transcript.append_assistant(
            &reply.text,
            reply.image.clone(),
            reply.image_prompt.clone(),
        );

        if !self.widget_open {
            self.unread = true;
        }

        // Voice-initiated text replies are read back; image replies are not.
        if is_voice && reply.image.is_none()
            && let Err(error) = self.voice.speak(&reply.text, id)
        {
            warn!(%error, "speech synthesis failed");
        }

        Some(id)
    }

    /// Composes and sends a structured image request from the generation
    /// panel. Unknown style or ratio ids fall back to the first preset.
    pub fn send_styled_image_prompt(
        &mut self,
        subject: &str,
        style_id: &str,
        ratio_id: &str,
    ) -> Option<u64> {
        let trimmed = subject.trim();
        if trimmed.is_empty() {
            return None;
        }
        let style = STYLE_PRESETS
            .iter()
            .find(|preset| preset.id == style_id)
            .or_else(|| STYLE_PRESETS.first())?;
        let ratio = ASPECT_RATIOS
            .iter()
            .find(|aspect| aspect.id == ratio_id)
            .or_else(|| ASPECT_RATIOS.first())?;

        let prompt = format!(
            "buatkan gambar: {trimmed}, {}, aspect ratio {}, width:{}, height:{}",
            style.prompt, ratio.ratio, ratio.width, ratio.height
        );
        self.send_message(&prompt, false)
    }

    pub fn toggle_voice_input(&mut self) {
        if let Err(error) = self.voice.toggle_listening(&self.language) {
            warn!(%error, "speech capture failed to start");
            self.voice.on_capture_error();
        }
    }

    pub fn on_transcript(&mut self, transcript: &str) {
        self.voice.on_transcript(transcript);
    }

    /// Capture session ended: the buffered transcript, if any, is sent as a
    /// voice message so the reply is spoken back.
    pub fn on_capture_end(&mut self) -> Option<u64> {
        let transcript = self.voice.on_capture_end()?;
        self.send_message(&transcript, true)
    }

    pub fn on_capture_error(&mut self) {
        self.voice.on_capture_error();
    }

    pub fn speak_message(&mut self, id: u64) {
        let Some(message) = self
            .transcript
            .messages()
            .iter()
            .find(|message| message.id == id)
        else {
            return;
        };
        let text = message.text.clone();
        if let Err(error) = self.voice.speak(&text, id) {
            warn!(%error, "speech synthesis failed");
        }
    }

    pub fn stop_speaking(&mut self) {
        self.voice.stop_speaking();
    }

    /// Adds the generated image carried by message `id` to the gallery.
    /// Images stay out of the gallery until the user asks; this is the only
    /// path in. Returns whether an entry was added.
    pub fn add_to_gallery(&mut self, id: u64) -> bool {
        let Some((data, prompt)) = self
            .transcript
            .messages()
            .iter()
            .find(|message| message.id == id)
            .and_then(|message| {
                let data = message.image.clone()?;
                Some((data, message.image_prompt.clone().unwrap_or_default()))
            })
        else {
            return false;
        };
        self.transcript.add_to_gallery(&data, &prompt)
    }

    pub fn toggle_liked(&mut self, id: u64) {
        self.transcript.toggle_liked(id);
    }

    pub fn toggle_saved(&mut self, id: u64) {
        self.transcript.toggle_saved(id);
    }

    pub fn open_widget(&mut self) {
        self.widget_open = true;
        self.unread = false;
    }

    /// Closing the widget silences playback before anything else; speech
    /// must never outlive the surface that started it.
    pub fn close_widget(&mut self) {
        self.voice.stop_speaking();
        self.widget_open = false;
    }

    pub fn clear_chat(&mut self) {
        self.voice.stop_speaking();
        self.transcript.clear();
    }

    /// Switches the recognition language. Unknown codes are ignored.
    pub fn set_language(&mut self, code: &str) {
        if language_by_code(code).is_none() {
            return;
        }
        self.language = code.to_string();
        self.transcript.save_language(code);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

    use super::*;
    use crate::agents::{ChatBackend, ChatFailure, ChatMessage, LlmReply};
    use crate::app::transcript::{CLEARED_TEXT, WELCOME_TEXT};
    use crate::app::types::Sender;
    use crate::services::image::ImageGenerator;
    use crate::services::voice::{NoopRecognizer, SpeechRecognizer, SpeechSynthesizer};
    use crate::storage::MemoryStore;
    use color_eyre::Result;
    use std::sync::{Arc, Mutex};

    struct RecordingSynth {
        spoken: Arc<Mutex<Vec<String>>>,
    }

    impl SpeechSynthesizer for RecordingSynth {
        fn speak(&self, text: &str) -> Result<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn stop(&self) {}
    }

    struct StubRecognizer;

    impl SpeechRecognizer for StubRecognizer {
        fn start(&mut self, _language: &str) -> Result<()> {
            Ok(())
        }

        fn stop(&mut self) {}
    }

    struct StubBackend {
        reply: Result<LlmReply, ChatFailure>,
    }

    impl ChatBackend for StubBackend {
        fn chat(
            &self,
            _system: &str,
            _history: &[ChatMessage],
            _message: &str,
        ) -> Result<LlmReply, ChatFailure> {
            self.reply.clone()
        }
    }

    struct StubImage {
        data: Option<String>,
    }

    impl ImageGenerator for StubImage {
        fn generate(&self, _prompt: &str) -> Option<String> {
            self.data.clone()
        }
    }

    fn session() -> ChatSession {
        session_with(None, Box::new(crate::services::voice::NoopSynthesizer))
    }

    fn session_with(
        agent: Option<AgentManager>,
        synth: Box<dyn SpeechSynthesizer>,
    ) -> ChatSession {
        let transcript = Transcript::load(Box::new(MemoryStore::default()));
        let voice = VoiceController::new(Box::new(StubRecognizer), synth);
        ChatSession::new(transcript, agent, voice)
    }

    #[test]
    fn test_send_message_appends_in_order() {
        let mut session = session();
        session.send_message("halo", false).unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, WELCOME_TEXT);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].text, "halo");
        assert_eq!(messages[2].sender, Sender::Assistant);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut session = session();
        assert_eq!(session.send_message("   ", false), None);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_offline_fallback_uses_rule_table() {
        let mut session = session();
        session.send_message("terima kasih", false).unwrap();
        let reply = session.messages().last().unwrap();
        assert!(!reply.text.is_empty());
        assert_eq!(reply.image, None);
    }

    #[test]
    fn test_voice_turn_is_spoken_back() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let mut session = session_with(
            None,
            Box::new(RecordingSynth { spoken: spoken.clone() }),
        );

        session.send_message("halo", true).unwrap();
        assert_eq!(spoken.lock().unwrap().len(), 1);

        session.send_message("halo lagi", false).unwrap();
        assert_eq!(spoken.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_image_reply_is_not_spoken() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let agent = AgentManager::new(
            Box::new(StubBackend {
                reply: Ok(LlmReply::ToolCall {
                    name: "generate_image".to_string(),
                    arguments: serde_json::json!({"prompt": "kucing"}),
                }),
            }),
            Box::new(StubImage { data: Some("data:image/png;base64,AA==".to_string()) }),
        );
        let mut session = session_with(
            Some(agent),
            Box::new(RecordingSynth { spoken: spoken.clone() }),
        );

        session.send_message("buatkan gambar kucing", true).unwrap();
        assert!(spoken.lock().unwrap().is_empty());

        let reply = session.messages().last().unwrap();
        assert!(reply.image.is_some());
        assert_eq!(reply.image_prompt.as_deref(), Some("kucing"));
    }

    #[test]
    fn test_gallery_only_fills_on_explicit_add() {
        let agent = AgentManager::new(
            Box::new(StubBackend {
                reply: Ok(LlmReply::ToolCall {
                    name: "generate_image".to_string(),
                    arguments: serde_json::json!({"prompt": "kucing"}),
                }),
            }),
            Box::new(StubImage { data: Some("data:image/png;base64,AA==".to_string()) }),
        );
        let mut session = session_with(
            Some(agent),
            Box::new(crate::services::voice::NoopSynthesizer),
        );

        let id = session.send_message("buatkan gambar kucing", false).unwrap();
        // Generated images are ephemeral until the user adds them.
        assert!(session.gallery().is_empty());

        assert!(session.add_to_gallery(id));
        assert_eq!(session.gallery().len(), 1);
        assert_eq!(session.gallery()[0].prompt, "kucing");

        // Adding the same payload again dedups.
        assert!(!session.add_to_gallery(id));
        assert_eq!(session.gallery().len(), 1);
    }

    #[test]
    fn test_gallery_add_rejects_imageless_messages() {
        let mut session = session();
        let id = session.send_message("halo", false).unwrap();
        assert!(!session.add_to_gallery(id));
        assert!(session.gallery().is_empty());
    }

    #[test]
    fn test_backend_failure_degrades_to_text() {
        let agent = AgentManager::new(
            Box::new(StubBackend { reply: Err(ChatFailure::RateLimited) }),
            Box::new(StubImage { data: None }),
        );
        let mut session = session_with(
            Some(agent),
            Box::new(crate::services::voice::NoopSynthesizer),
        );

        session.send_message("halo", false).unwrap();
        let reply = session.messages().last().unwrap();
        assert!(reply.text.contains("Terlalu banyak permintaan"));
        assert_eq!(reply.image, None);
    }

    #[test]
    fn test_unread_tracks_widget_visibility() {
        let mut session = session();
        assert!(!session.has_unread());

        session.send_message("halo", false).unwrap();
        assert!(session.has_unread());

        session.open_widget();
        assert!(!session.has_unread());

        session.send_message("halo lagi", false).unwrap();
        assert!(!session.has_unread());
    }

    #[test]
    fn test_clear_resets_transcript() {
        let mut session = session();
        session.send_message("halo", false).unwrap();
        session.clear_chat();

        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, CLEARED_TEXT);
    }

    #[test]
    fn test_capture_end_sends_voice_message() {
        let mut session = session();
        session.toggle_voice_input();
        session.on_transcript("siapa kamu");
        let id = session.on_capture_end();
        assert!(id.is_some());
        assert_eq!(session.messages()[1].text, "siapa kamu");
        assert!(session.messages()[1].from_voice);
    }

    #[test]
    fn test_capture_error_sends_nothing() {
        let mut session = session();
        session.toggle_voice_input();
        session.on_transcript("setengah");
        session.on_capture_error();
        assert_eq!(session.on_capture_end(), None);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_styled_prompt_composition() {
        let mut session = session();
        session
            .send_styled_image_prompt("naga merah", "cyberpunk", "landscape")
            .unwrap();

        let prompt = &session.messages()[1].text;
        assert!(prompt.starts_with("buatkan gambar: naga merah"));
        assert!(prompt.contains("cyberpunk style"));
        assert!(prompt.contains("aspect ratio 16:9"));
        assert!(prompt.contains("width:1344"));
    }

    #[test]
    fn test_set_language_rejects_unknown_codes() {
        let mut session = session();
        session.set_language("xx-XX");
        assert_eq!(session.language(), "id-ID");
        session.set_language("en-US");
        assert_eq!(session.language(), "en-US");
    }

    #[test]
    fn test_noop_recognizer_keeps_session_usable() {
        let transcript = Transcript::load(Box::new(MemoryStore::default()));
        let voice = VoiceController::new(
            Box::new(NoopRecognizer),
            Box::new(crate::services::voice::NoopSynthesizer),
        );
        let mut session = ChatSession::new(transcript, None, voice);
        session.toggle_voice_input();
        assert!(!session.voice().is_listening());
        assert!(session.send_message("halo", false).is_some());
    }
}
