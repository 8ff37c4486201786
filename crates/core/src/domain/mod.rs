pub mod candidate;
pub mod intent;
pub mod recommendation;
