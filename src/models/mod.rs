mod message;
mod reasoning;

pub use message::{Message, Role};
pub use reasoning::{parse_reasoning, render_steps, ReasoningResult, ReasoningStep};
