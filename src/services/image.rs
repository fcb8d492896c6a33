use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use color_eyre::Result;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, warn};

// Diffusion-style generation is slow; give the provider two minutes.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Seam for text-to-image providers: a prompt in, a self-contained data URI
/// out. Failure is absence, never an error; the caller substitutes a
/// user-facing apology.
pub trait ImageGenerator {
    fn generate(&self, prompt: &str) -> Option<String>;
}

/// Pollinations-style provider: a templated GET returning raw image bytes.
pub struct PollinationsClient {
    base_url: String,
    width: u32,
    height: u32,
    client: Client,
}

impl PollinationsClient {
    pub fn new(base_url: &str, width: u32, height: u32) -> Result<Self> {
        let client = Client::builder().timeout(GENERATION_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            width,
            height,
            client,
        })
    }

    fn prompt_url(&self, prompt: &str) -> String {
        format!(
            "{}/prompt/{}?width={}&height={}&seed={}&nologo=true",
            self.base_url,
            urlencoding::encode(prompt),
            self.width,
            self.height,
            chrono::Utc::now().timestamp_millis(),
        )
    }
}

impl ImageGenerator for PollinationsClient {
    fn generate(&self, prompt: &str) -> Option<String> {
        let url = self.prompt_url(prompt);
        debug!(%prompt, "requesting image generation");

        let response = match self.client.get(&url).header("Accept", "image/*").send() {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "image request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "image fetch returned an error status");
            return None;
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !mime.starts_with("image/") {
            warn!(%mime, "image fetch returned a non-image payload");
            return None;
        }

        let bytes = match response.bytes() {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%error, "failed to read image body");
                return None;
            }
        };

        Some(encode_data_uri(&mime, &bytes))
    }
}

/// Re-encodes raw image bytes as a data URI so nothing downstream ever needs
/// a live network reference to display or persist the image.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_encode_data_uri() {
        assert_eq!(
            encode_data_uri("image/png", b"abc"),
            "data:image/png;base64,YWJj"
        );
    }

    #[test]
    fn test_prompt_url_encodes_prompt_and_dimensions() {
        let client = PollinationsClient::new("https://image.pollinations.ai/", 1024, 768).unwrap();
        let url = client.prompt_url("kucing lucu & naga");

        assert!(url.starts_with("https://image.pollinations.ai/prompt/kucing%20lucu%20%26%20naga?"));
        assert!(url.contains("width=1024"));
        assert!(url.contains("height=768"));
        assert!(url.contains("nologo=true"));
    }
}
