use std::sync::LazyLock;

use dinebot_core::domain::intent::{Cuisine, ExtractedSlots, Intent};
use regex::Regex;

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"in ([A-Za-z ]+)").expect("location pattern is valid"));

#[derive(Clone, Debug, Default)]
pub struct SlotExtractor;

impl SlotExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, query: &str) -> ExtractedSlots {
        let normalized_text = normalize_text(query);

        ExtractedSlots {
            intent: extract_intent(&normalized_text),
            location: extract_location(query),
            cuisine: extract_cuisine(&normalized_text),
        }
    }
}

fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}

fn extract_intent(normalized_text: &str) -> Intent {
    if normalized_text.contains("menu") || normalized_text.contains("dish") {
        return Intent::Menu;
    }
    if normalized_text.contains("open") || normalized_text.contains("hours") {
        return Intent::Hours;
    }
    Intent::Search
}

// Case-sensitive on purpose: only the lowercase token "in " introduces a place.
fn extract_location(query: &str) -> Option<String> {
    let captures = LOCATION_RE.captures(query)?;
    let phrase = captures.get(1)?.as_str().trim();
    (!phrase.is_empty()).then(|| phrase.to_string())
}

fn extract_cuisine(normalized_text: &str) -> Option<Cuisine> {
    Cuisine::ALL.into_iter().find(|cuisine| normalized_text.contains(cuisine.as_str()))
}
