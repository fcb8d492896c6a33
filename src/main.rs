// Defensive programming lints - prevent panics and unsafe patterns
#![deny(clippy::indexing_slicing)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::needless_return)]
#![warn(clippy::let_and_return)]

use color_eyre::Result;
use fiqri_bot::agents::AgentManager;
use fiqri_bot::app::transcript::Transcript;
use fiqri_bot::app::types::LANGUAGES;
use fiqri_bot::app::ChatSession;
use fiqri_bot::config::Config;
use fiqri_bot::services::voice::{ElevenLabsSynthesizer, NoopRecognizer, VoiceController};
use fiqri_bot::storage::{ChatStore, MemoryStore, SurrealStore};
use std::io::{self, BufRead, Write};
use tracing::warn;

fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // Load config
    let config = Config::load()?;

    let store = open_store();
    let transcript = Transcript::load(store);
    let has_stored_language = transcript.load_language().is_some();

    let agent = match AgentManager::from_config(&config) {
        Ok(agent) => agent,
        Err(error) => {
            warn!(%error, "chat backend unavailable, using rule-based replies");
            None
        }
    };

    let synthesizer = ElevenLabsSynthesizer::new(
        config.elevenlabs.api_key.clone(),
        config.elevenlabs.voice_id.clone(),
        config.elevenlabs.model.clone(),
    );
    let voice = VoiceController::new(Box::new(NoopRecognizer), Box::new(synthesizer));

    let mut session = ChatSession::new(transcript, agent, voice);
    if !has_stored_language {
        session.set_language(&config.assistant.language);
    }
    session.open_widget();

    run_repl(&mut session)
}

/// Opens the embedded database in the platform data directory, falling back
/// to in-memory state when it is unusable.
fn open_store() -> Box<dyn ChatStore> {
    let opened = SurrealStore::default_path().and_then(|path| SurrealStore::open(&path));
    match opened {
        Ok(store) => Box::new(store),
        Err(error) => {
            warn!(%error, "database unavailable, chat history will not persist");
            Box::new(MemoryStore::default())
        }
    }
}

fn run_repl(session: &mut ChatSession) -> Result<()> {
    print_transcript(session);
    println!("Commands: /clear /saved /gallery [add] /lang <code> /quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        match input {
            "" => {}
            "/quit" => break,
            "/clear" => {
                session.clear_chat();
                print_transcript(session);
            }
            "/saved" => {
                for message in session.saved_messages() {
                    println!("[{}] {}", message.display_time(), message.text);
                }
            }
            "/gallery" => {
                for image in session.gallery() {
                    println!("[{}] {}", image.timestamp, image.prompt);
                }
            }
            "/gallery add" => {
                let last_image = session
                    .messages()
                    .iter()
                    .rev()
                    .find(|message| message.image.is_some())
                    .map(|message| message.id);
                match last_image {
                    Some(id) if session.add_to_gallery(id) => println!("Added to gallery."),
                    Some(_) => println!("Already in the gallery."),
                    None => println!("No generated image to add."),
                }
            }
            _ if input.starts_with("/lang") => {
                let code = input.trim_start_matches("/lang").trim();
                if code.is_empty() {
                    for language in LANGUAGES {
                        println!("{} - {}", language.code, language.name);
                    }
                } else {
                    session.set_language(code);
                    println!("Language: {}", session.language());
                }
            }
            _ => {
                if session.send_message(input, false).is_some()
                    && let Some(reply) = session.messages().last()
                {
                    println!("{}", reply.text);
                    if reply.image.is_some() {
                        println!("(image generated, see gallery)");
                    }
                }
            }
        }
    }

    session.close_widget();
    Ok(())
}

fn print_transcript(session: &ChatSession) {
    for message in session.messages() {
        println!("[{}] {}", message.display_time(), message.text);
    }
}
