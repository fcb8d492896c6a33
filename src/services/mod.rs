pub mod chatbot;
pub mod image;
pub mod voice;

pub use voice::VoiceController;
