use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dinebot_core::catalog::RestaurantCatalog;
use dinebot_core::config::GeocoderConfig;
use dinebot_core::domain::candidate::Candidate;
use dinebot_core::domain::intent::Cuisine;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const SEARCH_FORMAT: &str = "jsonv2";
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("search request failed: {0}")]
    Network(String),
    #[error("search request timed out")]
    Timeout,
    #[error("search service returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed search response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for LocatorError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Malformed(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

/// One entry of the geocoding service's JSON array. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<PlaceAddress>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceAddress {
    #[serde(default)]
    pub city: Option<String>,
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, terms: &str, limit: usize) -> Result<Vec<Place>, LocatorError>;
}

pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl NominatimClient {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl PlaceSearch for NominatimClient {
    async fn search(&self, terms: &str, limit: usize) -> Result<Vec<Place>, LocatorError> {
        debug!(
            event_name = "agent.locator.search_request",
            terms = %terms,
            limit,
            "querying geocoding service"
        );

        let limit = limit.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", terms), ("format", SEARCH_FORMAT), ("limit", limit.as_str())])
            .header(USER_AGENT, self.user_agent.as_str())
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LocatorError::Api { status: status.as_u16(), message: body });
        }

        let body = response.text().await?;
        parse_places(&body)
    }
}

pub fn parse_places(body: &str) -> Result<Vec<Place>, LocatorError> {
    serde_json::from_str::<Vec<Place>>(body).map_err(|error| LocatorError::Malformed(error.to_string()))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    EmptyResult,
    Unavailable(String),
}

/// Result of a lookup. The live list is never merged with the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocateOutcome {
    Live(Vec<Candidate>),
    Fallback { candidates: Vec<Candidate>, reason: FallbackReason },
}

impl LocateOutcome {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::Live(candidates) | Self::Fallback { candidates, .. } => candidates,
        }
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            Self::Live(candidates) | Self::Fallback { candidates, .. } => candidates,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

pub struct RestaurantLocator {
    search: Arc<dyn PlaceSearch>,
    catalog: RestaurantCatalog,
}

impl RestaurantLocator {
    pub fn new(search: Arc<dyn PlaceSearch>, catalog: RestaurantCatalog) -> Self {
        Self { search, catalog }
    }

    pub async fn locate(
        &self,
        query: &str,
        location: Option<&str>,
        cuisine: Option<Cuisine>,
        limit: usize,
    ) -> LocateOutcome {
        let terms = search_terms(location, cuisine);

        let reason = match self.search.search(&terms, limit).await {
            Ok(places) if !places.is_empty() => {
                let candidates = places
                    .into_iter()
                    .take(limit)
                    .map(|place| candidate_from_place(place, location))
                    .collect::<Vec<_>>();
                debug!(
                    event_name = "agent.locator.live_results",
                    query = %query,
                    result_count = candidates.len(),
                    "live search returned candidates"
                );
                return LocateOutcome::Live(candidates);
            }
            Ok(_) => FallbackReason::EmptyResult,
            Err(error) => FallbackReason::Unavailable(error.to_string()),
        };

        let candidates = self.catalog.filter(location, cuisine.map(|c| c.as_str()), limit);
        warn!(
            event_name = "agent.locator.fallback",
            query = %query,
            reason = ?reason,
            result_count = candidates.len(),
            "live search unusable; filtered built-in catalog instead"
        );
        LocateOutcome::Fallback { candidates, reason }
    }
}

pub fn search_terms(location: Option<&str>, cuisine: Option<Cuisine>) -> String {
    let mut terms = vec!["restaurant"];
    if let Some(cuisine) = cuisine {
        terms.push(cuisine.as_str());
    }
    if let Some(location) = location {
        terms.push(location);
    }
    terms.join(" ")
}

fn candidate_from_place(place: Place, location: Option<&str>) -> Candidate {
    let name = place.display_name.unwrap_or_else(|| UNKNOWN.to_string());
    let city = place
        .address
        .and_then(|address| address.city)
        .or_else(|| location.map(str::to_string))
        .unwrap_or_else(|| UNKNOWN.to_string());
    Candidate::live(name, city, place.lat, place.lon)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use dinebot_core::catalog::RestaurantCatalog;
    use dinebot_core::config::{AppConfig, GeocoderConfig};
    use dinebot_core::domain::candidate::candidate_names;
    use dinebot_core::domain::intent::Cuisine;

    use super::{
        parse_places, search_terms, FallbackReason, LocateOutcome, LocatorError, NominatimClient,
        Place, PlaceAddress, PlaceSearch, RestaurantLocator,
    };
    use crate::test_support::serve_once;

    struct StubSearch {
        response: Result<Vec<Place>, String>,
        seen: Mutex<Vec<(String, usize)>>,
    }

    impl StubSearch {
        fn returning(places: Vec<Place>) -> Arc<Self> {
            Arc::new(Self { response: Ok(places), seen: Mutex::new(Vec::new()) })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self { response: Err(message.to_string()), seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl PlaceSearch for StubSearch {
        async fn search(&self, terms: &str, limit: usize) -> Result<Vec<Place>, LocatorError> {
            self.seen.lock().expect("seen lock").push((terms.to_string(), limit));
            self.response.clone().map_err(LocatorError::Network)
        }
    }

    fn place(name: Option<&str>, city: Option<&str>) -> Place {
        Place {
            display_name: name.map(str::to_string),
            address: city.map(|city| PlaceAddress { city: Some(city.to_string()) }),
            lat: Some("12.97".to_string()),
            lon: Some("77.64".to_string()),
        }
    }

    #[test]
    fn search_terms_join_restaurant_cuisine_location() {
        assert_eq!(search_terms(None, None), "restaurant");
        assert_eq!(
            search_terms(Some("Indiranagar"), Some(Cuisine::Vegetarian)),
            "restaurant vegetarian Indiranagar"
        );
        assert_eq!(search_terms(Some("MG Road"), None), "restaurant MG Road");
    }

    #[test]
    fn parse_places_accepts_partial_entries() {
        let places = parse_places(
            r#"[{"display_name": "Cafe One", "lat": "1.0", "lon": "2.0"}, {"address": {"city": "Pune"}}]"#,
        )
        .expect("array should parse");

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].display_name.as_deref(), Some("Cafe One"));
        assert_eq!(places[1].address.as_ref().and_then(|a| a.city.as_deref()), Some("Pune"));
    }

    #[test]
    fn parse_places_rejects_non_array_bodies() {
        assert!(matches!(parse_places(r#"{"error": "busy"}"#), Err(LocatorError::Malformed(_))));
        assert!(matches!(parse_places("<html>"), Err(LocatorError::Malformed(_))));
    }

    #[tokio::test]
    async fn live_results_win_outright_and_map_defaults() {
        let search = StubSearch::returning(vec![
            place(Some("Green Leaf, 100 Feet Road"), Some("Bengaluru")),
            place(None, None),
        ]);
        let locator = RestaurantLocator::new(search.clone(), RestaurantCatalog::sample());

        let outcome = locator
            .locate("veg food in Indiranagar", Some("Indiranagar"), Some(Cuisine::Vegetarian), 5)
            .await;

        let LocateOutcome::Live(candidates) = outcome else {
            panic!("expected live outcome");
        };
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Green Leaf, 100 Feet Road");
        assert_eq!(candidates[0].location, "Bengaluru");
        assert_eq!(candidates[0].latitude.as_deref(), Some("12.97"));
        assert_eq!(candidates[1].name, "Unknown");
        assert_eq!(candidates[1].location, "Indiranagar");
        assert!(candidates.iter().all(|candidate| candidate.cuisine.is_none()));

        let seen = search.seen.lock().expect("seen lock").clone();
        assert_eq!(seen, vec![("restaurant vegetarian Indiranagar".to_string(), 5)]);
    }

    #[tokio::test]
    async fn live_location_defaults_to_unknown_without_slot() {
        let locator = RestaurantLocator::new(
            StubSearch::returning(vec![place(Some("Somewhere"), None)]),
            RestaurantCatalog::sample(),
        );

        let candidates = locator.locate("food", None, None, 5).await.into_candidates();
        assert_eq!(candidates[0].location, "Unknown");
    }

    #[tokio::test]
    async fn live_results_are_truncated_to_limit() {
        let places = (0..8).map(|index| place(Some(format!("Place {index}").as_str()), None)).collect();
        let locator =
            RestaurantLocator::new(StubSearch::returning(places), RestaurantCatalog::sample());

        let outcome = locator.locate("food", None, None, 3).await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.candidates().len(), 3);
    }

    #[tokio::test]
    async fn failure_falls_back_to_filtered_catalog() {
        let locator = RestaurantLocator::new(
            StubSearch::failing("connection refused"),
            RestaurantCatalog::sample(),
        );

        let outcome =
            locator.locate("query", Some("Indiranagar"), Some(Cuisine::Vegetarian), 5).await;

        match &outcome {
            LocateOutcome::Fallback { candidates, reason } => {
                assert_eq!(candidate_names(candidates), vec!["Green Veggie".to_string()]);
                assert!(matches!(reason, FallbackReason::Unavailable(message)
                    if message.contains("connection refused")));
            }
            LocateOutcome::Live(_) => panic!("expected fallback outcome"),
        }
    }

    #[tokio::test]
    async fn empty_live_result_falls_back_and_may_be_empty() {
        let locator =
            RestaurantLocator::new(StubSearch::returning(Vec::new()), RestaurantCatalog::sample());

        let outcome = locator.locate("query", Some("Atlantis"), None, 5).await;

        assert_eq!(
            outcome,
            LocateOutcome::Fallback { candidates: Vec::new(), reason: FallbackReason::EmptyResult }
        );
    }

    #[tokio::test]
    async fn fallback_respects_limit() {
        let locator =
            RestaurantLocator::new(StubSearch::failing("timeout"), RestaurantCatalog::sample());

        let outcome = locator.locate("anything", None, None, 2).await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.candidates().len(), 2);
    }

    fn geocoder_at(base_url: &str, timeout_secs: u64) -> GeocoderConfig {
        let mut config = AppConfig::default().geocoder;
        config.base_url = format!("{base_url}/search.php");
        config.timeout_secs = timeout_secs;
        config
    }

    #[tokio::test]
    async fn nominatim_request_carries_query_format_limit_and_user_agent() {
        let (base_url, captured) = serve_once(
            "200 OK",
            r#"[{"display_name": "Green Leaf", "address": {"city": "Bengaluru"}, "lat": "12.9", "lon": "77.6"}]"#,
            Duration::ZERO,
        )
        .await;
        let client = NominatimClient::new(&geocoder_at(&base_url, 10));

        let places = client
            .search("restaurant vegetarian Indiranagar", 5)
            .await
            .expect("stub search should succeed");

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].display_name.as_deref(), Some("Green Leaf"));

        let request = captured.await.expect("request captured");
        assert_eq!(
            request.request_line,
            "GET /search.php?q=restaurant+vegetarian+Indiranagar&format=jsonv2&limit=5 HTTP/1.1"
        );
        assert_eq!(request.header("user-agent"), Some("RestaurantBot/1.0"));
    }

    #[tokio::test]
    async fn nominatim_error_status_becomes_api_error() {
        let (base_url, _captured) =
            serve_once("503 Service Unavailable", "busy", Duration::ZERO).await;
        let client = NominatimClient::new(&geocoder_at(&base_url, 10));

        let error = client.search("restaurant", 5).await.expect_err("503 should fail");

        assert!(
            matches!(&error, LocatorError::Api { status: 503, message } if message == "busy"),
            "unexpected error: {error:?}"
        );
    }

    #[tokio::test]
    async fn nominatim_slow_reply_times_out() {
        let (base_url, _captured) = serve_once("200 OK", "[]", Duration::from_secs(3)).await;
        let client = NominatimClient::new(&geocoder_at(&base_url, 1));

        let error = client.search("restaurant", 5).await.expect_err("slow reply should fail");

        assert!(matches!(error, LocatorError::Timeout), "unexpected error: {error:?}");
    }
}
