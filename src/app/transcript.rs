use crate::app::types::{GeneratedImage, Message, Sender};
use crate::storage::{ChatStore, LANGUAGE_KEY, SAVED_KEY, TRANSCRIPT_KEY};
use tracing::warn;

pub const WELCOME_TEXT: &str = "Hello! Welcome to my portfolio. How can I help you today? 😊";
pub const CLEARED_TEXT: &str = "Chat cleared. How can I help you? 😊";

/// Single source of truth for the transcript, the saved-message snapshots and
/// the generated-image gallery.
///
/// The transcript is append-only; the only in-place edits are the liked/saved
/// flag toggles. Every mutation writes the full collection through to the
/// store so an abrupt exit never loses history. Persistence failures are
/// logged, never surfaced: losing durability degrades, losing the chat does
/// not.
pub struct Transcript {
    store: Box<dyn ChatStore>,
    messages: Vec<Message>,
    saved: Vec<Message>,
    gallery: Vec<GeneratedImage>,
    next_id: u64,
}

impl Transcript {
    /// Loads persisted state, seeding a welcome message when none exists.
    /// Absence of storage is not an error.
    pub fn load(store: Box<dyn ChatStore>) -> Self {
        let messages = Self::load_collection(&*store, TRANSCRIPT_KEY);
        let saved = Self::load_collection(&*store, SAVED_KEY);

        let highest_id = messages
            .iter()
            .chain(saved.iter())
            .map(|message| message.id)
            .max()
            .unwrap_or(0);

        let mut transcript = Self {
            store,
            messages,
            saved,
            gallery: Vec::new(),
            next_id: highest_id + 1,
        };

        if transcript.messages.is_empty() {
            let id = transcript.take_id();
            transcript.messages.push(Message::assistant(id, WELCOME_TEXT, None));
            transcript.persist_transcript();
        }

        transcript
    }

    fn load_collection(store: &dyn ChatStore, key: &str) -> Vec<Message> {
        match store.load(key) {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(messages) => messages,
                Err(error) => {
                    warn!(%error, key, "discarding unreadable stored state");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, key, "failed to load stored state");
                Vec::new()
            }
        }
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn saved(&self) -> &[Message] {
        &self.saved
    }

    #[must_use]
    pub fn gallery(&self) -> &[GeneratedImage] {
        &self.gallery
    }

    /// Appends a user message and returns its id.
    pub fn append_user(&mut self, text: &str, from_voice: bool) -> u64 {
        let id = self.take_id();
        self.messages.push(Message::user(id, text, from_voice));
        self.persist_transcript();
        id
    }

    /// Appends an assistant message, optionally carrying a generated image
    /// and the prompt that produced it, and returns its id.
    pub fn append_assistant(
        &mut self,
        text: &str,
        image: Option<String>,
        image_prompt: Option<String>,
    ) -> u64 {
        let id = self.take_id();
        let mut message = Message::assistant(id, text, image);
        message.image_prompt = image_prompt;
        self.messages.push(message);
        self.persist_transcript();
        id
    }

    /// Toggles the liked flag on an assistant message.
    pub fn toggle_liked(&mut self, id: u64) {
        if let Some(message) = self
            .messages
            .iter_mut()
            .find(|message| message.id == id && message.sender == Sender::Assistant)
        {
            message.liked = !message.liked;
            self.persist_transcript();
        }
    }

    /// Toggles membership in the saved collection. Saving snapshots the
    /// message as it is right now; later edits to the live copy do not reach
    /// the snapshot.
    pub fn toggle_saved(&mut self, id: u64) {
        if self.saved.iter().any(|message| message.id == id) {
            self.saved.retain(|message| message.id != id);
            if let Some(message) = self.messages.iter_mut().find(|message| message.id == id) {
                message.saved = false;
            }
        } else {
            let Some(message) = self
                .messages
                .iter_mut()
                .find(|message| message.id == id && message.sender == Sender::Assistant)
            else {
                return;
            };
            message.saved = true;
            self.saved.push(message.clone());
        }
        self.persist_transcript();
        self.persist_saved();
    }

    /// Replaces the transcript with a single fresh "cleared" message and
    /// erases the persisted transcript. The saved collection is untouched.
    pub fn clear(&mut self) {
        self.messages.clear();
        if let Err(error) = self.store.clear(TRANSCRIPT_KEY) {
            warn!(%error, "failed to clear persisted transcript");
        }
        let id = self.take_id();
        self.messages.push(Message::assistant(id, CLEARED_TEXT, None));
        self.persist_transcript();
    }

    /// Adds an image to the gallery unless an identical payload is already
    /// there. Returns whether the entry was added.
    pub fn add_to_gallery(&mut self, data: &str, prompt: &str) -> bool {
        if self.gallery.iter().any(|image| image.data == data) {
            return false;
        }
        self.gallery.push(GeneratedImage {
            data: data.to_string(),
            prompt: prompt.to_string(),
            timestamp: chrono::Local::now().to_rfc3339(),
        });
        true
    }

    pub fn load_language(&self) -> Option<String> {
        self.store.load(LANGUAGE_KEY).ok().flatten()
    }

    pub fn save_language(&self, code: &str) {
        if let Err(error) = self.store.save(LANGUAGE_KEY, code) {
            warn!(%error, "failed to persist language preference");
        }
    }

    fn persist_transcript(&self) {
        self.persist(TRANSCRIPT_KEY, &self.messages);
    }

    fn persist_saved(&self) {
        self.persist(SAVED_KEY, &self.saved);
    }

    fn persist(&self, key: &str, messages: &[Message]) {
        match serde_json::to_string(messages) {
            Ok(payload) => {
                if let Err(error) = self.store.save(key, &payload) {
                    warn!(%error, key, "failed to persist state");
                }
            }
            Err(error) => warn!(%error, key, "failed to serialize state"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn memory_transcript() -> (Transcript, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (Transcript::load(Box::new(store.clone())), store)
    }

    #[test]
    fn test_seeds_welcome_message() {
        let (transcript, _) = memory_transcript();
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].text, WELCOME_TEXT);
        assert_eq!(transcript.messages()[0].sender, Sender::Assistant);
    }

    #[test]
    fn test_append_preserves_creation_order() {
        let (mut transcript, _) = memory_transcript();
        let first = transcript.append_user("satu", false);
        let second = transcript.append_assistant("dua", None, None);
        let third = transcript.append_user("tiga", true);

        let ids: Vec<u64> = transcript.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids[1..], [first, second, third]);
        assert!(first < second && second < third);
        assert!(transcript.messages()[3].from_voice);
    }

    #[test]
    fn test_round_trip_persistence() {
        let store = Arc::new(MemoryStore::default());
        let before: Vec<Message> = {
            let mut transcript = Transcript::load(Box::new(store.clone()));
            transcript.append_user("halo", false);
            transcript.append_assistant("hai juga", None, None);
            transcript.append_user("apa kabar", true);
            transcript.messages().to_vec()
        };

        let reloaded = Transcript::load(Box::new(store));
        assert_eq!(reloaded.messages(), before.as_slice());
    }

    #[test]
    fn test_ids_keep_increasing_after_reload() {
        let store = Arc::new(MemoryStore::default());
        let last_id = {
            let mut transcript = Transcript::load(Box::new(store.clone()));
            transcript.append_user("halo", false)
        };

        let mut reloaded = Transcript::load(Box::new(store));
        let next = reloaded.append_user("lagi", false);
        assert!(next > last_id);
    }

    #[test]
    fn test_saved_snapshot_is_independent() {
        let (mut transcript, _) = memory_transcript();
        let id = transcript.append_assistant("jawaban penting", None, None);
        transcript.toggle_saved(id);

        transcript.toggle_liked(id);

        let live = transcript.messages().iter().find(|m| m.id == id).unwrap();
        let snapshot = transcript.saved().iter().find(|m| m.id == id).unwrap();
        assert!(live.liked);
        assert!(!snapshot.liked);
    }

    #[test]
    fn test_toggle_saved_twice_removes_snapshot() {
        let (mut transcript, _) = memory_transcript();
        let id = transcript.append_assistant("jawaban", None, None);

        transcript.toggle_saved(id);
        assert_eq!(transcript.saved().len(), 1);

        transcript.toggle_saved(id);
        assert!(transcript.saved().is_empty());
        let live = transcript.messages().iter().find(|m| m.id == id).unwrap();
        assert!(!live.saved);
    }

    #[test]
    fn test_user_messages_cannot_be_saved_or_liked() {
        let (mut transcript, _) = memory_transcript();
        let id = transcript.append_user("pesan user", false);

        transcript.toggle_saved(id);
        transcript.toggle_liked(id);

        assert!(transcript.saved().is_empty());
        let live = transcript.messages().iter().find(|m| m.id == id).unwrap();
        assert!(!live.liked);
    }

    #[test]
    fn test_clear_resets_transcript_but_not_saved() {
        let store = Arc::new(MemoryStore::default());
        let mut transcript = Transcript::load(Box::new(store.clone()));
        let id = transcript.append_assistant("simpan aku", None, None);
        transcript.toggle_saved(id);
        transcript.append_user("lalu hapus", false);

        let saved_before = transcript.saved().to_vec();
        transcript.clear();

        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].text, CLEARED_TEXT);
        assert_eq!(transcript.saved(), saved_before.as_slice());

        // The persisted copy now holds only the cleared message.
        let reloaded = Transcript::load(Box::new(store));
        assert_eq!(reloaded.messages().len(), 1);
        assert_eq!(reloaded.messages()[0].text, CLEARED_TEXT);
        assert_eq!(reloaded.saved(), saved_before.as_slice());
    }

    #[test]
    fn test_gallery_dedups_by_payload() {
        let (mut transcript, _) = memory_transcript();
        assert!(transcript.add_to_gallery("data:image/png;base64,AAA", "kucing"));
        assert!(!transcript.add_to_gallery("data:image/png;base64,AAA", "kucing lagi"));
        assert!(transcript.add_to_gallery("data:image/png;base64,BBB", "naga"));
        assert_eq!(transcript.gallery().len(), 2);
    }

    #[test]
    fn test_language_preference_round_trip() {
        let (transcript, _) = memory_transcript();
        assert_eq!(transcript.load_language(), None);
        transcript.save_language("en-US");
        assert_eq!(transcript.load_language(), Some("en-US".to_string()));
    }
}
