use serde::{Deserialize, Serialize};

/// One restaurant-like record proposed by the locator.
///
/// Live search results carry coordinates; catalog entries carry cuisine and
/// menu instead. Candidates live for a single request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub location: String,
    #[serde(rename = "lat", default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(rename = "lon", default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
}

impl Candidate {
    pub fn live(
        name: impl Into<String>,
        location: impl Into<String>,
        latitude: Option<String>,
        longitude: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            latitude,
            longitude,
            cuisine: None,
            menu: None,
        }
    }

    pub fn catalog(
        name: impl Into<String>,
        cuisine: impl Into<String>,
        location: impl Into<String>,
        menu: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            latitude: None,
            longitude: None,
            cuisine: Some(cuisine.into()),
            menu: Some(menu.into()),
        }
    }
}

pub fn candidate_names(candidates: &[Candidate]) -> Vec<String> {
    candidates.iter().map(|candidate| candidate.name.clone()).collect()
}
