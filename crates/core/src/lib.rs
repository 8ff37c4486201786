pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use catalog::RestaurantCatalog;
pub use domain::candidate::{candidate_names, Candidate};
pub use domain::intent::{Cuisine, ExtractedSlots, Intent};
pub use domain::recommendation::{ChatRequest, ChatResponse, ParsedPayload, Recommendation};
pub use errors::{ApplicationError, DomainError, InterfaceError};
