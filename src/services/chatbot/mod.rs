//! Offline intent dispatcher.
//!
//! Free text is classified by an ordered first-match rule table; rule order
//! encodes priority and must stay in sync with the tests below. Arithmetic is
//! handled before everything else because its trigger words ("berapa",
//! "hasil") overlap generic question words. The dispatcher cannot fail: every
//! input yields some response string.

pub mod math;
pub mod replies;

use chrono::{Datelike, Local, Timelike};
use rand::seq::SliceRandom;

/// Canned response families, evaluated in the order of [`RULES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    MathFact,
    Time,
    Status,
    Greeting,
    Farewell,
    About,
    Skills,
    Contact,
    Projects,
    Weather,
    Thanks,
    Help,
    Jokes,
}

/// First substring match wins. Do not reorder without updating the
/// priority tests.
const RULES: &[(&[&str], Family)] = &[
    (replies::MATH_FACT_KEYWORDS, Family::MathFact),
    (replies::TIME_KEYWORDS, Family::Time),
    (replies::STATUS_KEYWORDS, Family::Status),
    (replies::GREETING_KEYWORDS, Family::Greeting),
    (replies::FAREWELL_KEYWORDS, Family::Farewell),
    (replies::ABOUT_KEYWORDS, Family::About),
    (replies::SKILLS_KEYWORDS, Family::Skills),
    (replies::CONTACT_KEYWORDS, Family::Contact),
    (replies::PROJECT_KEYWORDS, Family::Projects),
    (replies::WEATHER_KEYWORDS, Family::Weather),
    (replies::THANK_KEYWORDS, Family::Thanks),
    (replies::HELP_KEYWORDS, Family::Help),
    (replies::JOKE_KEYWORDS, Family::Jokes),
];

/// Classifies the input and returns a response. Always produces a string.
pub fn respond(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return "Ketik pesan ya!".to_string();
    }

    // Arithmetic first: an input with a math keyword either evaluates or
    // gets the generic math-help family, never a later rule.
    if contains_keyword(trimmed, replies::MATH_KEYWORDS) {
        if let Some(result) = math::calculate(trimmed) {
            return result;
        }
        return pick(replies::MATH_RESPONSES);
    }

    for (keywords, family) in RULES {
        if contains_keyword(trimmed, keywords) {
            return family_response(*family);
        }
    }

    pick(replies::DEFAULT_RESPONSES)
}

fn family_response(family: Family) -> String {
    match family {
        Family::MathFact => pick(replies::MATH_FACTS),
        Family::Time => time_response(),
        Family::Status => pick(replies::STATUS_RESPONSES),
        Family::Greeting => pick(replies::GREETING_RESPONSES),
        Family::Farewell => pick(replies::FAREWELL_RESPONSES),
        Family::About => pick_owned(replies::about_responses()),
        Family::Skills => pick_owned(replies::skills_responses()),
        Family::Contact => pick_owned(replies::contact_responses()),
        Family::Projects => pick_owned(replies::project_responses()),
        Family::Weather => pick(replies::WEATHER_RESPONSES),
        Family::Thanks => pick(replies::THANK_RESPONSES),
        Family::Help => pick(replies::HELP_RESPONSES),
        Family::Jokes => pick(replies::JOKE_RESPONSES),
    }
}

fn contains_keyword(input: &str, keywords: &[&str]) -> bool {
    let lower = input.to_lowercase();
    keywords.iter().any(|keyword| lower.contains(keyword))
}

fn pick(responses: &[&str]) -> String {
    let mut rng = rand::thread_rng();
    responses
        .choose(&mut rng)
        .map(|s| (*s).to_string())
        .unwrap_or_default()
}

fn pick_owned(responses: Vec<String>) -> String {
    let mut rng = rand::thread_rng();
    responses.choose(&mut rng).cloned().unwrap_or_default()
}

const WEEKDAYS: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];
const MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus",
    "September", "Oktober", "November", "Desember",
];

// Computed at response time, not canned.
fn time_response() -> String {
    let now = Local::now();
    let weekday = WEEKDAYS
        .get(now.weekday().num_days_from_monday() as usize)
        .copied()
        .unwrap_or("");
    let month = MONTHS
        .get(now.month0() as usize)
        .copied()
        .unwrap_or("");
    format!(
        "Sekarang jam {:02}.{:02}, hari {weekday}, {} {month} {}. Ada yang bisa saya bantu?",
        now.hour(),
        now.minute(),
        now.day(),
        now.year()
    )
}
