//! Recommendation pipeline for free-text restaurant queries.
//!
//! One query flows through a fixed, linear set of stages:
//! 1. **Slot extraction** (`conversation`) - intent, location and cuisine
//! 2. **Candidate lookup** (`locator`) - live place search, built-in catalog fallback
//! 3. **Prompt composition** (`prompt`) - persona, few-shot examples, candidate context
//! 4. **Model invocation** (`llm`) - one hosted chat completion, degraded on failure
//! 5. **Reconciliation** (`reconcile`) - always yields a two-field payload
//!
//! `AgentRuntime` (see `runtime`) wires the stages together. External services
//! sit behind the `PlaceSearch` and `LlmClient` traits so tests can swap them out.
//!
//! No stage returns an error to the caller; every failure has a degraded but
//! valid output.

pub mod conversation;
pub mod llm;
pub mod locator;
pub mod prompt;
pub mod reconcile;
pub mod runtime;

#[cfg(test)]
mod test_support;
