use crate::error::{R3asonError, Result};
use serde::{Deserialize, Serialize};

/// A single reasoning step. Also used for revisions, which are steps that
/// record a not-yet-settled choice being reconsidered.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReasoningStep {
    pub header: String,
    pub details: String,
    /// Display-only ordinal hint. Never validated for uniqueness or
    /// contiguity; rendering uses the element's position instead.
    pub number: i64,
}

/// The structured breakdown the model is required to produce. Only
/// `final_answer` flows back into the conversation log; the rest is
/// ephemeral scratch output for this turn.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReasoningResult {
    pub interpretation: String,
    pub steps: Vec<ReasoningStep>,
    pub revisions: Vec<ReasoningStep>,
    pub final_answer: String,
}

/// Decode raw response text into a [`ReasoningResult`].
///
/// Malformed JSON and missing or mistyped required fields both map to
/// `SchemaViolation`. Unknown extra keys are ignored. Presence and
/// primitive type are the only things enforced here; emptiness of the
/// text fields is the model's problem.
pub fn parse_reasoning(raw: &str) -> Result<ReasoningResult> {
    serde_json::from_str(raw).map_err(|e| R3asonError::SchemaViolation(e.to_string()))
}

/// Render steps (or revisions) as an enumerated multi-line block: a
/// 1-based ordinal prefix followed by a pretty-printed dump of each entry.
pub fn render_steps(steps: &[ReasoningStep]) -> Result<String> {
    let mut lines = Vec::with_capacity(steps.len());
    for (idx, step) in steps.iter().enumerate() {
        lines.push(format!("{}. {}", idx + 1, serde_json::to_string_pretty(step)?));
    }
    Ok(lines.join("\n"))
}
