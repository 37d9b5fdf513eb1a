use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Serialize)]
pub struct RequestBody {
    pub model: String,
    pub messages: Vec<crate::models::Message>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

#[derive(Deserialize)]
pub struct Delta {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub delta: Option<Delta>,
}

#[derive(Deserialize)]
pub struct StreamResponse {
    pub choices: Option<Vec<Choice>>,
}

/// The `response_format` directive that constrains the model's output to
/// the reasoning schema (OpenAI structured outputs).
pub fn reasoning_response_format() -> Value {
    let step = json!({
        "type": "object",
        "properties": {
            "header": { "type": "string" },
            "details": { "type": "string" },
            "number": { "type": "integer" }
        },
        "required": ["header", "details", "number"],
        "additionalProperties": false
    });

    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "reasoning",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "interpretation": { "type": "string" },
                    "steps": { "type": "array", "items": step.clone() },
                    "revisions": { "type": "array", "items": step },
                    "final_answer": { "type": "string" }
                },
                "required": ["interpretation", "steps", "revisions", "final_answer"],
                "additionalProperties": false
            }
        }
    })
}
