use dinebot_core::domain::candidate::Candidate;
use dinebot_core::domain::intent::Intent;

const SYSTEM_INSTRUCTION: &str = "
You are DineBot, a helpful restaurant assistant.
Use ONLY the provided restaurant list.
Always return JSON:
{\"restaurants\": [...], \"explanation\": \"...\"}
";

const EMPTY_CONTEXT: &str = "No restaurants found.";
const ANSWER_CUE: &str = "Assistant:";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FewShotExample {
    pub user: &'static str,
    pub assistant: &'static str,
}

pub const FEW_SHOT_EXAMPLES: [FewShotExample; 2] = [
    FewShotExample {
        user: "Find vegetarian restaurants in Indiranagar",
        assistant: r#"{"restaurants": ["Green Veggie"], "explanation": "Green Veggie is a highly rated vegetarian restaurant in Indiranagar."}"#,
    },
    FewShotExample {
        user: "Suggest Japanese food near MG Road",
        assistant: r#"{"restaurants": ["Sushi Zen"], "explanation": "Sushi Zen is a popular Japanese restaurant near MG Road with authentic sushi."}"#,
    },
];

#[derive(Clone, Debug, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Builds the single-turn prompt. `intent` is part of the signature so
    /// per-intent instructions can be added later; today every intent shares
    /// one template.
    pub fn compose(&self, _intent: Intent, query: &str, candidates: &[Candidate]) -> String {
        let mut prompt = String::from(SYSTEM_INSTRUCTION);

        for example in &FEW_SHOT_EXAMPLES {
            prompt.push_str(&format!("\nUser: {}\n{ANSWER_CUE} {}", example.user, example.assistant));
        }

        prompt.push_str(&format!(
            "\nContext:\n{}\nUser: {query}\n{ANSWER_CUE}",
            render_context(candidates)
        ));
        prompt
    }
}

fn render_context(candidates: &[Candidate]) -> String {
    if candidates.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }

    candidates
        .iter()
        .map(|candidate| format!("- {}, {}", candidate.name, candidate.location))
        .collect::<Vec<_>>()
        .join("\n")
}
