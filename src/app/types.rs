use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single transcript entry. Ids are assigned by the transcript store and
/// are strictly increasing within a session; timestamps are RFC 3339.
/// Only assistant messages carry `liked`, `saved` or `image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: String,
    #[serde(default)]
    pub from_voice: bool,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_prompt: Option<String>,
}

impl Message {
    fn now_timestamp() -> String {
        chrono::Local::now().to_rfc3339()
    }

    pub fn user(id: u64, text: impl Into<String>, from_voice: bool) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            timestamp: Self::now_timestamp(),
            from_voice,
            liked: false,
            saved: false,
            image: None,
            image_prompt: None,
        }
    }

    pub fn assistant(id: u64, text: impl Into<String>, image: Option<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Assistant,
            timestamp: Self::now_timestamp(),
            from_voice: false,
            liked: false,
            saved: false,
            image,
            image_prompt: None,
        }
    }

    /// Clock-face rendering of the timestamp for display.
    #[must_use]
    pub fn display_time(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

/// A generated image kept in the gallery. Entries are deduplicated by
/// payload identity; the payload is a self-contained data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub data: String,
    pub prompt: String,
    pub timestamp: String,
}

/// A speech recognition/synthesis locale offered by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { code: "id-ID", name: "Indonesia" },
    Language { code: "en-US", name: "English" },
    Language { code: "ja-JP", name: "日本語" },
    Language { code: "es-ES", name: "Español" },
    Language { code: "zh-CN", name: "中文" },
];

#[must_use]
pub fn language_by_code(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|language| language.code == code)
}

/// A style preset for the image generation panel; `prompt` is appended to
/// the user's subject before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const STYLE_PRESETS: &[StylePreset] = &[
    StylePreset {
        id: "realistic",
        name: "Realistic Photo",
        prompt: "ultra realistic photo, 8k, professional photography",
    },
    StylePreset {
        id: "cyberpunk",
        name: "Cyberpunk",
        prompt: "cyberpunk style, neon lights, futuristic, dark atmosphere",
    },
    StylePreset {
        id: "ghibli",
        name: "Ghibli Anime",
        prompt: "studio ghibli style, anime art, soft colors, whimsical",
    },
    StylePreset {
        id: "3d",
        name: "3D Render",
        prompt: "pixar style, 3d render, octane render, high quality",
    },
    StylePreset {
        id: "oil",
        name: "Oil Painting",
        prompt: "oil painting style, classical art, brush strokes, masterpiece",
    },
    StylePreset {
        id: "retro",
        name: "Retro 80s",
        prompt: "retro 80s style, synthwave, vaporwave, vintage aesthetic",
    },
];

/// Target dimensions for the image generation panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub id: &'static str,
    pub name: &'static str,
    pub ratio: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const ASPECT_RATIOS: &[AspectRatio] = &[
    AspectRatio { id: "square", name: "Square", ratio: "1:1", width: 1024, height: 1024 },
    AspectRatio { id: "portrait", name: "Portrait", ratio: "9:16", width: 768, height: 1344 },
    AspectRatio { id: "landscape", name: "Landscape", ratio: "16:9", width: 1344, height: 768 },
    AspectRatio { id: "wide", name: "Ultrawide", ratio: "21:9", width: 1680, height: 720 },
];
