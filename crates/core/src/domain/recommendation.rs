use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The two-field recommendation contract the model is asked to honour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub restaurants: Vec<String>,
    pub explanation: String,
}

impl Recommendation {
    pub fn new(restaurants: Vec<String>, explanation: impl Into<String>) -> Self {
        Self { restaurants, explanation: explanation.into() }
    }

    pub fn to_json_text(&self) -> String {
        json!({"restaurants": self.restaurants, "explanation": self.explanation}).to_string()
    }
}

/// Structured payload handed back to callers.
///
/// A model reply that parses as a JSON object is kept verbatim, including any
/// missing or extra fields; everything else is replaced by a synthesized
/// [`Recommendation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedPayload(Map<String, Value>);

impl ParsedPayload {
    pub fn from_object(object: Map<String, Value>) -> Self {
        Self(object)
    }

    pub fn restaurants(&self) -> Option<Vec<String>> {
        let values = self.0.get("restaurants")?.as_array()?;
        Some(
            values
                .iter()
                .map(|value| match value {
                    Value::String(name) => name.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }

    pub fn explanation(&self) -> Option<&str> {
        self.0.get("explanation")?.as_str()
    }
}

impl From<Recommendation> for ParsedPayload {
    fn from(recommendation: Recommendation) -> Self {
        let mut object = Map::new();
        object.insert(
            "restaurants".to_string(),
            Value::Array(recommendation.restaurants.into_iter().map(Value::String).collect()),
        );
        object.insert("explanation".to_string(), Value::String(recommendation.explanation));
        Self(object)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub parsed: ParsedPayload,
    pub raw: String,
}
