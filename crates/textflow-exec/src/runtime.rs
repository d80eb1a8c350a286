//! Runtime: drive an operator tree to completion and emit a RunSummary.
//!
//! Behavior:
//! - `open` the root, pull until exhaustion, `close`.
//! - On a pull error, still attempt `close` before propagating; abandoning a
//!   pipeline mid-stream must release upstream resources.
//! - Construction helpers apply `EngineConfig` knobs (pattern cache
//!   capacity, connector buffer capacity) so callers configure in one place.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use textflow_core::config::EngineConfig;
use textflow_core::tuple::Tuple;

use textflow_operators::connector::BroadcastConnector;
use textflow_operators::matchers::regex::{RegexMatcher, RegexPredicate};
use textflow_operators::traits::{BoxedOperator, OpError, Operator};
use textflow_operators::unary::UnaryOperator;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("operator error: {0}")]
    Operator(#[from] OpError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

/// Provenance record for one drained pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: RunId,

    /// Engine version string for provenance.
    pub engine_version: String,

    /// Tuples the root operator emitted before exhaustion.
    pub tuples_emitted: usize,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

/// Engine owns the configuration and drives pipelines synchronously.
pub struct Engine {
    cfg: EngineConfig,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Regex matcher operator with the configured pattern cache capacity.
    pub fn regex_matcher(&self, predicate: RegexPredicate) -> UnaryOperator<RegexMatcher> {
        UnaryOperator::new(
            RegexMatcher::new(predicate)
                .with_pattern_cache_capacity(self.cfg.pattern_cache_capacity),
        )
    }

    /// Broadcast connector with the configured replay-buffer capacity.
    pub fn broadcast(
        &self,
        input: BoxedOperator,
        fan_out: usize,
    ) -> Result<BroadcastConnector, ExecError> {
        Ok(BroadcastConnector::with_capacity(
            input,
            fan_out,
            self.cfg.buffer_capacity,
        )?)
    }

    /// Open, drain, and close the given operator, collecting every tuple it
    /// emits.
    pub fn collect(
        &self,
        op: &mut dyn Operator,
    ) -> Result<(Vec<Tuple>, RunSummary), ExecError> {
        let started_ms = now_ms();
        op.open()?;

        let mut tuples = Vec::new();
        loop {
            match op.pull() {
                Ok(Some(tuple)) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(op = op.name(), emitted = tuples.len() + 1, "pulled tuple");
                    tuples.push(tuple);
                }
                Ok(None) => break,
                Err(e) => {
                    // Release upstream resources even when abandoning the
                    // run; the pull error stays the primary failure.
                    let _ = op.close();
                    return Err(e.into());
                }
            }
        }

        op.close()?;

        let summary = RunSummary {
            id: RunId(Uuid::new_v4()),
            engine_version: textflow_core::VERSION.to_string(),
            tuples_emitted: tuples.len(),
            started_ms,
            finished_ms: now_ms(),
        };
        Ok((tuples, summary))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
