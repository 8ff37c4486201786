use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse classification of what a query asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Menu,
    Hours,
    #[default]
    Search,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Hours => "hours",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed cuisine vocabulary. `ALL` is the match order used by slot extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cuisine {
    Vegetarian,
    Italian,
    Japanese,
    American,
    Indian,
    Sushi,
    Pizza,
    Burger,
}

impl Cuisine {
    pub const ALL: [Cuisine; 8] = [
        Self::Vegetarian,
        Self::Italian,
        Self::Japanese,
        Self::American,
        Self::Indian,
        Self::Sushi,
        Self::Pizza,
        Self::Burger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Italian => "italian",
            Self::Japanese => "japanese",
            Self::American => "american",
            Self::Indian => "indian",
            Self::Sushi => "sushi",
            Self::Pizza => "pizza",
            Self::Burger => "burger",
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intent plus the best-effort slots pulled out of a raw query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedSlots {
    pub intent: Intent,
    pub location: Option<String>,
    pub cuisine: Option<Cuisine>,
}

#[cfg(test)]
mod tests {
    use super::{Cuisine, Intent};

    #[test]
    fn intent_defaults_to_search() {
        assert_eq!(Intent::default(), Intent::Search);
        assert_eq!(Intent::Hours.to_string(), "hours");
    }

    #[test]
    fn cuisine_vocabulary_order_is_fixed() {
        let names = Cuisine::ALL.iter().map(Cuisine::as_str).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["vegetarian", "italian", "japanese", "american", "indian", "sushi", "pizza", "burger"]
        );
    }

    #[test]
    fn intent_serializes_as_snake_case_tag() {
        let encoded = serde_json::to_string(&Intent::Menu).expect("serialize intent");
        assert_eq!(encoded, "\"menu\"");
    }
}
