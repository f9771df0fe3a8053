//! Reasoning and signal accumulator shared by the pipeline steps

use crate::signals::SignalResult;
use tracing::{debug, warn};

const BASE_CONFIDENCE: f64 = 0.6;
const CONFIDENCE_PER_SIGNAL: f64 = 0.05;
const MAX_SIGNAL_BOOST: f64 = 0.4;

/// `min(1.0, 0.6 + min(0.4, 0.05 * n))`
pub fn confidence_for(signal_count: usize) -> f64 {
    let boost = (signal_count as f64 * CONFIDENCE_PER_SIGNAL).min(MAX_SIGNAL_BOOST);
    (BASE_CONFIDENCE + boost).min(1.0)
}

/// Ordered reasoning lines plus the distinct signal sources that contributed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalTrace {
    reasoning: Vec<String>,
    signals_used: Vec<String>,
}

impl SignalTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reason(&mut self, line: impl Into<String>) {
        self.reasoning.push(line.into());
    }

    /// Record a contributing source; repeats are ignored
    pub fn record(&mut self, signal: &str) {
        if !self.signals_used.iter().any(|s| s == signal) {
            self.signals_used.push(signal.to_string());
        }
    }

    /// Reasoning line plus signal in one call, the common case for a fired rule
    pub fn contribute(&mut self, signal: &str, line: impl Into<String>) {
        self.reason(line);
        self.record(signal);
    }

    pub fn reasoning(&self) -> &[String] {
        &self.reasoning
    }

    pub fn signals_used(&self) -> &[String] {
        &self.signals_used
    }

    pub fn has_signal(&self, signal: &str) -> bool {
        self.signals_used.iter().any(|s| s == signal)
    }

    pub fn confidence(&self) -> f64 {
        confidence_for(self.signals_used.len())
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.reasoning, self.signals_used)
    }
}

/// Collapse a provider answer to `Option`, logging the reason a signal was skipped.
/// Unavailable, malformed and "no match" all skip the signal silently in the output.
pub fn accept<T>(signal: &str, key: &str, result: SignalResult<T>) -> Option<T> {
    match result {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            debug!("{}: no match for `{}`", signal, key);
            None
        }
        Err(e) => {
            warn!("{} skipped for `{}`: {}", signal, key, e);
            None
        }
    }
}
