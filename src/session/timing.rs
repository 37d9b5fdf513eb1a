/// Per-turn timing metadata. Derived once per call, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSample {
    /// Wall-clock duration of the whole turn, in seconds.
    pub total_duration: f64,
    /// Arithmetic mean of the inter-fragment arrival gaps, in seconds.
    /// `None` when no fragments were received (buffered mode, or an
    /// empty stream).
    pub average_token_latency: Option<f64>,
}

impl TimingSample {
    pub fn new(total_duration: f64, gaps: &[f64]) -> Self {
        let average_token_latency = if gaps.is_empty() {
            None
        } else {
            Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
        };
        Self {
            total_duration,
            average_token_latency,
        }
    }

    /// Human-readable timing annotation. The average is only shown when
    /// it is defined and positive.
    pub fn annotate(&self) -> String {
        let mut annotation = format!("Time taken: {:.2}s", self.total_duration);
        if let Some(avg) = self.average_token_latency {
            if avg > 0.0 {
                annotation.push_str(&format!(" (Avg: {:.3}ms)", avg * 1000.0));
            }
        }
        annotation
    }
}
