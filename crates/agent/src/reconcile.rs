use dinebot_core::domain::candidate::{candidate_names, Candidate};
use dinebot_core::domain::recommendation::{ParsedPayload, Recommendation};
use serde_json::Value;
use tracing::info;

use crate::llm::InvocationOutcome;

#[derive(Clone, Debug, PartialEq)]
pub enum Reconciliation {
    /// The model reply parsed as a JSON object and is passed through untouched.
    Parsed(ParsedPayload),
    Synthesized(ParsedPayload),
}

impl Reconciliation {
    pub fn payload(&self) -> &ParsedPayload {
        match self {
            Self::Parsed(payload) | Self::Synthesized(payload) => payload,
        }
    }

    pub fn into_payload(self) -> ParsedPayload {
        match self {
            Self::Parsed(payload) | Self::Synthesized(payload) => payload,
        }
    }
}

pub fn reconcile(raw_text: &str, candidates: &[Candidate]) -> Reconciliation {
    match serde_json::from_str::<Value>(raw_text) {
        Ok(Value::Object(object)) => Reconciliation::Parsed(ParsedPayload::from_object(object)),
        _ => {
            info!(
                event_name = "agent.reconcile.synthesized",
                candidate_count = candidates.len(),
                "model reply was not a JSON object; using candidate names"
            );
            synthesize(candidates, raw_text)
        }
    }
}

/// Reconciles a tagged invocation result. A degraded invocation never reached
/// the model, so its reason becomes the explanation next to the candidate names.
pub fn reconcile_outcome(outcome: &InvocationOutcome, candidates: &[Candidate]) -> Reconciliation {
    match outcome {
        InvocationOutcome::Completed(text) => reconcile(text, candidates),
        InvocationOutcome::Degraded { reason, .. } => synthesize(candidates, reason.explanation()),
    }
}

fn synthesize(candidates: &[Candidate], explanation: impl Into<String>) -> Reconciliation {
    Reconciliation::Synthesized(ParsedPayload::from(Recommendation::new(
        candidate_names(candidates),
        explanation,
    )))
}
