pub mod gemini;

use crate::app::types::{Message, Sender};
use crate::config::Config;
use crate::services::image::{ImageGenerator, PollinationsClient};
use color_eyre::Result;
use gemini::GeminiClient;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// At most this many transcript messages are sent as model context. The
/// transcript itself grows without bound; the request body must not.
const HISTORY_WINDOW: usize = 30;

/// Persona and capability instruction prepended to every model context. The
/// image-tool trigger phrasing lives here so the model knows when to call it.
const SYSTEM_INSTRUCTION: &str = "\
Kamu adalah asisten virtual bernama Fiqri Bot, AI assistant yang ramah dan \
helpful untuk website portfolio Fiqri Agustriawan (biasa dipanggil Fiqri).

=== TENTANG FIQRI ===
Nama: Fiqri Agustriawan (Fiqri)
Peran: Web Developer, saat ini Mahasiswa di Indonesia
Keahlian: React, Next.js, TypeScript, JavaScript, HTML, CSS, Tailwind CSS
GitHub: https://github.com/FiqriAgustriawan
Portfolio: https://fiqriagustriawan.github.io

=== CARA MENJAWAB ===
- Gunakan bahasa Indonesia yang santai tapi sopan
- Jawab dengan singkat dan jelas (maksimal 2-3 paragraf)
- Kamu boleh memakai format markdown secukupnya (**bold**, daftar, `backtick`)
- Kalau ditanya hal yang tidak kamu tahu, bilang dengan jujur

=== TOOL GAMBAR ===
Jika pengguna meminta dibuatkan gambar (misalnya \"buatkan gambar ...\", \
\"gambarkan ...\", \"generate image ...\"), panggil tool generate_image dengan \
argumen prompt berupa deskripsi gambar dalam bahasa Inggris yang detail. \
Jangan menjawab dengan teks untuk permintaan gambar.

=== LARANGAN ===
- Menjawab pertanyaan yang tidak pantas
- Berpura-pura menjadi orang lain";

const IMAGE_ACK: &str = "Ini gambarnya! Semoga sesuai dengan yang kamu bayangkan. ✨";
const IMAGE_FAILURE: &str =
    "Maaf, gambarnya gagal dibuat. Coba lagi dalam beberapa saat ya!";
const UNKNOWN_TOOL: &str = "Maaf, saya tidak bisa melakukan itu.";
const EMPTY_REPLY: &str = "Maaf, saya tidak punya jawaban untuk itu. Coba tanya hal lain!";

/// Role of a message in model context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message as the model sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into() }
    }
}

/// Provider-agnostic model reply. `Image` covers providers that execute the
/// image tool server-side and hand back a finished data URI.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmReply {
    Text(String),
    ToolCall { name: String, arguments: Value },
    Image { text: String, image: String },
}

/// Failure classes the orchestrator knows how to degrade. Each renders as a
/// distinct localized assistant message; none of them ever reach the
/// presentation layer as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFailure {
    RateLimited,
    Unauthorized,
    ModelUnavailable,
    NetworkFailure,
}

impl ChatFailure {
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            ChatFailure::RateLimited => {
                "Terlalu banyak permintaan. Coba lagi dalam beberapa detik! ⏳"
            }
            ChatFailure::Unauthorized => "API key tidak valid.",
            ChatFailure::ModelUnavailable => {
                "Model sedang tidak tersedia. Coba lagi nanti ya!"
            }
            ChatFailure::NetworkFailure => "Maaf, gagal terhubung ke server.",
        }
    }
}

impl fmt::Display for ChatFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChatFailure::RateLimited => "rate_limited",
            ChatFailure::Unauthorized => "unauthorized",
            ChatFailure::ModelUnavailable => "model_unavailable",
            ChatFailure::NetworkFailure => "network_failure",
        };
        f.write_str(name)
    }
}

/// Seam to the remote chat-completion service.
pub trait ChatBackend {
    fn chat(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<LlmReply, ChatFailure>;
}

/// What one chat turn hands back to the session facade. Always renderable:
/// failures arrive here already converted to assistant-voice text.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    pub image: Option<String>,
    pub image_prompt: Option<String>,
}

impl AssistantReply {
    fn text_only(text: impl Into<String>) -> Self {
        Self { text: text.into(), image: None, image_prompt: None }
    }
}

/// Mediates model context and tool-calling for image generation.
pub struct AgentManager {
    backend: Box<dyn ChatBackend>,
    image: Box<dyn ImageGenerator>,
}

impl AgentManager {
    pub fn new(backend: Box<dyn ChatBackend>, image: Box<dyn ImageGenerator>) -> Self {
        Self { backend, image }
    }

    /// Builds the manager from configuration. An empty API key means an
    /// offline deployment; the caller falls back to the rule-based assistant.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        if config.gemini.api_key.trim().is_empty() {
            return Ok(None);
        }
        let backend = GeminiClient::new(&config.gemini.endpoint, &config.gemini.api_key)?;
        let image = PollinationsClient::new(
            &config.pollinations.base_url,
            config.pollinations.width,
            config.pollinations.height,
        )?;
        Ok(Some(Self::new(Box::new(backend), Box::new(image))))
    }

    /// Runs one chat turn: bounded context, model call, optional image tool.
    /// `transcript` is the conversation so far, excluding the new user text.
    pub fn chat(&self, transcript: &[Message], user_text: &str) -> AssistantReply {
        let history = build_history(transcript);

        match self.backend.chat(SYSTEM_INSTRUCTION, &history, user_text) {
            Ok(LlmReply::Text(text)) => {
                if text.trim().is_empty() {
                    AssistantReply::text_only(EMPTY_REPLY)
                } else {
                    AssistantReply::text_only(text)
                }
            }
            Ok(LlmReply::Image { text, image }) => AssistantReply {
                text,
                image: Some(image),
                image_prompt: None,
            },
            Ok(LlmReply::ToolCall { name, arguments }) if name == "generate_image" => {
                self.run_image_tool(&arguments, user_text)
            }
            Ok(LlmReply::ToolCall { name, .. }) => {
                warn!(%name, "model requested an unknown tool");
                AssistantReply::text_only(UNKNOWN_TOOL)
            }
            Err(failure) => {
                warn!(%failure, "chat backend failure");
                AssistantReply::text_only(failure.user_message())
            }
        }
    }

    fn run_image_tool(&self, arguments: &Value, user_text: &str) -> AssistantReply {
        let prompt = arguments
            .get("prompt")
            .and_then(Value::as_str)
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or(user_text)
            .to_string();
        debug!(%prompt, "model requested image generation");

        match self.image.generate(&prompt) {
            Some(data) => AssistantReply {
                text: IMAGE_ACK.to_string(),
                image: Some(data),
                image_prompt: Some(prompt),
            },
            None => AssistantReply::text_only(IMAGE_FAILURE),
        }
    }
}

fn build_history(transcript: &[Message]) -> Vec<ChatMessage> {
    let skip = transcript.len().saturating_sub(HISTORY_WINDOW);
    transcript
        .iter()
        .skip(skip)
        .map(|message| match message.sender {
            Sender::User => ChatMessage::user(&message.text),
            Sender::Assistant => ChatMessage::assistant(&message.text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

    use super::*;
    use serde_json::json;

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
        result: Option<String>,
    }

    impl ImageGenerator for StubImage {
        fn generate(&self, _prompt: &str) -> Option<String> {
            self.result.clone()
        }
    }

    fn manager(reply: Result<LlmReply, ChatFailure>, image: Option<String>) -> AgentManager {
        AgentManager::new(
            Box::new(StubBackend { reply }),
            Box::new(StubImage { result: image }),
        )
    }

    #[test]
    fn test_text_reply_passes_through() {
        let manager = manager(Ok(LlmReply::Text("Halo!".to_string())), None);
        let reply = manager.chat(&[], "hai");
        assert_eq!(reply.text, "Halo!");
        assert_eq!(reply.image, None);
    }

    #[test]
    fn test_tool_call_produces_image_reply() {
        let manager = manager(
            Ok(LlmReply::ToolCall {
                name: "generate_image".to_string(),
                arguments: json!({ "prompt": "a cute cat" }),
            }),
            Some("data:image/png;base64,AAA".to_string()),
        );
        let reply = manager.chat(&[], "buatkan gambar kucing");
        assert_eq!(reply.image.as_deref(), Some("data:image/png;base64,AAA"));
        assert_eq!(reply.image_prompt.as_deref(), Some("a cute cat"));
        assert!(!reply.text.is_empty());
    }

    #[test]
    fn test_image_failure_degrades_to_apology() {
        let manager = manager(
            Ok(LlmReply::ToolCall {
                name: "generate_image".to_string(),
                arguments: json!({ "prompt": "a cute cat" }),
            }),
            None,
        );
        let reply = manager.chat(&[], "buatkan gambar kucing");
        assert!(!reply.text.is_empty());
        assert_eq!(reply.image, None);
    }

    #[test]
    fn test_unknown_tool_degrades() {
        let manager = manager(
            Ok(LlmReply::ToolCall {
                name: "delete_everything".to_string(),
                arguments: json!({}),
            }),
            None,
        );
        let reply = manager.chat(&[], "halo");
        assert_eq!(reply.text, UNKNOWN_TOOL);
        assert_eq!(reply.image, None);
    }

    #[test]
    fn test_failures_render_localized_messages() {
        for failure in [
            ChatFailure::RateLimited,
            ChatFailure::Unauthorized,
            ChatFailure::ModelUnavailable,
            ChatFailure::NetworkFailure,
        ] {
            let manager = manager(Err(failure), None);
            let reply = manager.chat(&[], "halo");
            assert_eq!(reply.text, failure.user_message());
            assert_eq!(reply.image, None);
        }
    }

    #[test]
    fn test_history_window_is_bounded() {
        let transcript: Vec<Message> = (0..40)
            .map(|i| Message::user(i, format!("pesan {i}"), false))
            .collect();
        let history = build_history(&transcript);
        assert_eq!(history.len(), HISTORY_WINDOW);
        assert_eq!(history[0].content, "pesan 10");
        assert_eq!(history[HISTORY_WINDOW - 1].content, "pesan 39");
    }
}
