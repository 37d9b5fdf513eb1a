mod timing;

pub use timing::TimingSample;

use crate::api::models::reasoning_response_format;
use crate::api::{CompletionTransport, RequestBody};
use crate::error::{R3asonError, Result};
use crate::models::{parse_reasoning, render_steps, Message};
use futures::StreamExt;
use std::time::Instant;

/// The fixed protocol instruction, prepended to every request and never
/// stored in the conversation log.
const REASONING_INSTRUCTION: &str = "Your response must be in JSON format. \
You will interpret the user's prompt and consider contextual factors and \
attempt to mitigate ambiguity. You will then generate a list of steps that \
you would need to take to answer the question or complete the task, plus a \
final answer. Each step header should begin with a gerund (e.g., \"Thinking \
about [...]\", \"Considering [...]\"). You will consider all possible \
factors and how each step relates to the others. Revisions are needed if \
you need to make a choice that you did not settle on yet so that you could \
proceed with reasoning. The user will not see the steps that you are \
reasoning about, so you should address each step with its own step-by-step \
instructions in your final answer.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryMode {
    /// One blocking request; the full response arrives as a single unit.
    Buffered,
    /// Streaming request; fragments are consumed one at a time, with
    /// per-fragment latency sampling.
    Incremental,
}

/// The rendered result of one completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutput {
    pub interpretation: String,
    pub steps: String,
    pub revisions: String,
    pub final_answer: String,
    pub timing: String,
}

/// A reasoning session: owns the conversation log and drives the
/// completion transport through the structured-reasoning protocol.
///
/// The log grows by exactly two entries per successful turn (user +
/// assistant). Not safe for concurrent turns; `&mut self` on
/// [`ReasoningSession::submit_turn`] enforces one call at a time.
pub struct ReasoningSession<T: CompletionTransport> {
    transport: T,
    model: String,
    messages: Vec<Message>,
}

impl<T: CompletionTransport> ReasoningSession<T> {
    pub fn new(transport: T, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
            messages: Vec::new(),
        }
    }

    /// The conversation log: user and assistant entries only, in append
    /// order. The protocol instruction is never part of it.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    /// Run one turn against the completion endpoint.
    ///
    /// In incremental mode each raw fragment is forwarded to `observer`
    /// as it arrives; the return value is still the fully-assembled
    /// result either way.
    ///
    /// Rollback policy: transport-class failures (HTTP error, timeout,
    /// empty stream) remove the just-appended user message, so a turn
    /// that never completed an exchange leaves the log unmodified. A
    /// `SchemaViolation` after a completed exchange keeps the user
    /// message, so the failed turn still consumes conversation context.
    pub async fn submit_turn(
        &mut self,
        message: &str,
        mode: DeliveryMode,
        observer: Option<&dyn Fn(&str)>,
    ) -> Result<TurnOutput> {
        self.messages.push(Message::user(message));

        let started = Instant::now();
        let request = self.build_request(mode == DeliveryMode::Incremental);

        let (raw, gaps) = match mode {
            DeliveryMode::Buffered => match self.transport.complete(&request).await {
                Ok(text) => (text, Vec::new()),
                Err(err) => {
                    self.messages.pop();
                    return Err(err);
                }
            },
            DeliveryMode::Incremental => match self.consume_stream(&request, observer).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.messages.pop();
                    return Err(err);
                }
            },
        };

        let result = parse_reasoning(&raw)?;

        self.messages
            .push(Message::assistant(result.final_answer.clone()));

        let sample = TimingSample::new(started.elapsed().as_secs_f64(), &gaps);

        Ok(TurnOutput {
            interpretation: result.interpretation,
            steps: render_steps(&result.steps)?,
            revisions: render_steps(&result.revisions)?,
            final_answer: result.final_answer,
            timing: sample.annotate(),
        })
    }

    /// Outbound request: protocol instruction first, then the full log
    /// including this turn's user message, constrained to the reasoning
    /// schema.
    fn build_request(&self, stream: bool) -> RequestBody {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(Message::system(REASONING_INSTRUCTION));
        messages.extend(self.messages.iter().cloned());

        RequestBody {
            model: self.model.clone(),
            messages,
            stream,
            response_format: Some(reasoning_response_format()),
        }
    }

    /// Consume a fragment stream: record the wall-clock gap before each
    /// fragment, forward it to the observer, and accumulate it. Only the
    /// final accumulation is parsed; partial JSON is never inspected.
    async fn consume_stream(
        &self,
        request: &RequestBody,
        observer: Option<&dyn Fn(&str)>,
    ) -> Result<(String, Vec<f64>)> {
        let mut fragments = self.transport.open_stream(request).await?;

        let mut accumulated = String::new();
        let mut gaps = Vec::new();
        let mut last_arrival = Instant::now();

        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            gaps.push(last_arrival.elapsed().as_secs_f64());
            last_arrival = Instant::now();

            if let Some(observer) = observer {
                observer(&fragment);
            }
            accumulated.push_str(&fragment);
        }

        if gaps.is_empty() {
            return Err(R3asonError::EmptyStream);
        }

        Ok((accumulated, gaps))
    }
}
