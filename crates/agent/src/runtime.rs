use std::sync::Arc;

use dinebot_core::catalog::RestaurantCatalog;
use dinebot_core::domain::recommendation::ChatResponse;
use tracing::info;

use crate::conversation::SlotExtractor;
use crate::llm::{LlmClient, ModelInvoker};
use crate::locator::{PlaceSearch, RestaurantLocator};
use crate::prompt::PromptComposer;
use crate::reconcile::{reconcile_outcome, Reconciliation};

pub const DEFAULT_CANDIDATE_LIMIT: usize = 5;

/// Runs the recommendation pipeline once per query:
/// slots → candidates → prompt → model → reconciled payload.
///
/// Holds no per-request state; one runtime serves any number of concurrent
/// queries.
pub struct AgentRuntime {
    extractor: SlotExtractor,
    locator: RestaurantLocator,
    composer: PromptComposer,
    invoker: ModelInvoker,
    candidate_limit: usize,
}

impl AgentRuntime {
    pub fn new(
        search: Arc<dyn PlaceSearch>,
        catalog: RestaurantCatalog,
        llm_client: Option<Arc<dyn LlmClient>>,
    ) -> Self {
        Self {
            extractor: SlotExtractor::new(),
            locator: RestaurantLocator::new(search, catalog),
            composer: PromptComposer::new(),
            invoker: ModelInvoker::new(llm_client),
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }

    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = limit;
        self
    }

    pub fn candidate_limit(&self) -> usize {
        self.candidate_limit
    }

    pub fn model_ready(&self) -> bool {
        self.invoker.has_client()
    }

    pub async fn handle_query(&self, query: &str) -> ChatResponse {
        let slots = self.extractor.extract(query);
        info!(
            event_name = "agent.query.slots",
            intent = %slots.intent,
            location = slots.location.as_deref().unwrap_or("-"),
            cuisine = slots.cuisine.map(|cuisine| cuisine.as_str()).unwrap_or("-"),
            "extracted query slots"
        );

        let located = self
            .locator
            .locate(query, slots.location.as_deref(), slots.cuisine, self.candidate_limit)
            .await;
        let candidates = located.into_candidates();

        let prompt = self.composer.compose(slots.intent, query, &candidates);
        let outcome = self.invoker.invoke(&prompt).await;

        let reconciliation = reconcile_outcome(&outcome, &candidates);
        info!(
            event_name = "agent.query.completed",
            candidate_count = candidates.len(),
            synthesized = matches!(reconciliation, Reconciliation::Synthesized(_)),
            "query answered"
        );

        ChatResponse { parsed: reconciliation.into_payload(), raw: outcome.into_raw_text() }
    }
}
