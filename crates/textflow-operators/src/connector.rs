//! Broadcast connector: one upstream operator fanned out to N branches.
//!
//! Every branch observes the exact upstream tuple sequence in the exact
//! upstream order, while the upstream itself is pulled at most once per
//! tuple. Already-pulled tuples are replayed to lagging branches from an
//! append-only buffer owned by the connector; branches hold only a cursor
//! into that buffer plus a status entry, never a reference to the upstream
//! or to each other.
//!
//! The buffer grows without bound while any branch lags. That is a
//! documented resource trade-off: the connector is meant for workloads whose
//! branches are all driven to completion.
//!
//! Branches are expected to be driven from a single thread. The shared state
//! sits behind one mutex so "serve from buffer or pull-and-append" is a
//! single atomic step; no lock-free guarantees are made.

use std::sync::{Arc, Mutex, MutexGuard};

use textflow_core::prelude::Schema;
use textflow_core::tuple::Tuple;

use crate::traits::{expect_one_input, BoxedOperator, OpError, Operator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchStatus {
    PreOpen,
    Opened,
    Closed,
}

/// State shared by all branches of one connector.
struct BroadcastInput {
    input: BoxedOperator,
    /// Append-only replay buffer of everything pulled from the input so far.
    buffer: Vec<Tuple>,
    statuses: Vec<BranchStatus>,
    input_opened: bool,
    input_exhausted: bool,
    output_schema: Option<Schema>,
}

/// Fan-out adapter over a single upstream operator.
///
/// Construct with the desired branch count, then claim each branch handle
/// once via [`BroadcastConnector::branch`]. The upstream is opened exactly
/// once (by whichever branch opens first) and closed exactly once (when the
/// last branch closes), after which the connector can be reopened for a
/// fresh run.
pub struct BroadcastConnector {
    shared: Arc<Mutex<BroadcastInput>>,
    claimed: Vec<bool>,
}

impl BroadcastConnector {
    pub fn new(input: BoxedOperator, fan_out: usize) -> Result<Self, OpError> {
        Self::with_capacity(input, fan_out, 0)
    }

    /// Like [`BroadcastConnector::new`] with an initial replay-buffer
    /// capacity hint.
    pub fn with_capacity(
        input: BoxedOperator,
        fan_out: usize,
        capacity: usize,
    ) -> Result<Self, OpError> {
        if fan_out == 0 {
            return Err(OpError::Config(
                "broadcast connector needs at least one branch".into(),
            ));
        }
        Ok(Self {
            shared: Arc::new(Mutex::new(BroadcastInput {
                input,
                buffer: Vec::with_capacity(capacity),
                statuses: vec![BranchStatus::PreOpen; fan_out],
                input_opened: false,
                input_exhausted: false,
                output_schema: None,
            })),
            claimed: vec![false; fan_out],
        })
    }

    pub fn fan_out(&self) -> usize {
        self.claimed.len()
    }

    /// Claim branch `index`. Each branch may be claimed once; two handles on
    /// the same cursor would silently split the stream.
    pub fn branch(&mut self, index: usize) -> Result<BroadcastBranch, OpError> {
        if index >= self.claimed.len() {
            return Err(OpError::Config(format!(
                "branch index {} out of range for fan-out {}",
                index,
                self.claimed.len()
            )));
        }
        if self.claimed[index] {
            return Err(OpError::Config(format!(
                "branch {} already claimed",
                index
            )));
        }
        self.claimed[index] = true;
        Ok(BroadcastBranch {
            shared: Arc::clone(&self.shared),
            index,
            cursor: 0,
            output_schema: None,
        })
    }

    /// The connector is schema-transparent: one input schema, unchanged.
    pub fn transform_schema(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        expect_one_input("broadcast", input_schemas).cloned()
    }
}

/// One downstream handle of a [`BroadcastConnector`]. Implements the full
/// operator protocol, so it can be wired as the input of any other operator.
pub struct BroadcastBranch {
    shared: Arc<Mutex<BroadcastInput>>,
    index: usize,
    /// Next unread position in the shared replay buffer.
    cursor: usize,
    output_schema: Option<Schema>,
}

impl BroadcastBranch {
    pub fn index(&self) -> usize {
        self.index
    }

    // Takes the field, not `&self`, so callers can keep mutating their own
    // cursor while the guard is alive.
    fn lock(shared: &Mutex<BroadcastInput>) -> Result<MutexGuard<'_, BroadcastInput>, OpError> {
        shared
            .lock()
            .map_err(|_| OpError::Dataflow("broadcast connector state poisoned".into()))
    }
}

impl Operator for BroadcastBranch {
    fn name(&self) -> &'static str {
        "broadcast_branch"
    }

    fn transform_schema(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        expect_one_input("broadcast", input_schemas).cloned()
    }

    fn open(&mut self) -> Result<(), OpError> {
        let mut guard = Self::lock(&self.shared)?;
        let inner = &mut *guard;
        if inner.statuses[self.index] == BranchStatus::Opened {
            return Ok(());
        }
        if !inner.input_opened {
            inner.input.open()?;
            let schema = inner.input.output_schema()?.clone();
            inner.output_schema = Some(schema);
            inner.input_opened = true;
        }
        inner.statuses[self.index] = BranchStatus::Opened;
        self.cursor = 0;
        self.output_schema = inner.output_schema.clone();
        Ok(())
    }

    fn pull(&mut self) -> Result<Option<Tuple>, OpError> {
        let mut guard = Self::lock(&self.shared)?;
        let inner = &mut *guard;
        match inner.statuses[self.index] {
            BranchStatus::PreOpen => {
                return Err(OpError::Config(format!(
                    "pull on broadcast branch {} before open",
                    self.index
                )));
            }
            BranchStatus::Closed => {
                return Err(OpError::Config(format!(
                    "pull on broadcast branch {} after close",
                    self.index
                )));
            }
            BranchStatus::Opened => {}
        }

        // Serve from the buffer while this branch is behind the others.
        if self.cursor < inner.buffer.len() {
            let tuple = inner.buffer[self.cursor].clone();
            self.cursor += 1;
            return Ok(Some(tuple));
        }

        if inner.input_exhausted {
            return Ok(None);
        }

        // This branch is at the frontier: pull the upstream exactly once.
        match inner.input.pull()? {
            None => {
                inner.input_exhausted = true;
                Ok(None)
            }
            Some(tuple) => {
                inner.buffer.push(tuple.clone());
                self.cursor += 1;
                Ok(Some(tuple))
            }
        }
    }

    fn close(&mut self) -> Result<(), OpError> {
        let mut guard = Self::lock(&self.shared)?;
        let inner = &mut *guard;
        if inner.statuses[self.index] == BranchStatus::Closed {
            return Ok(());
        }
        inner.statuses[self.index] = BranchStatus::Closed;
        if inner
            .statuses
            .iter()
            .all(|s| *s == BranchStatus::Closed)
        {
            // Last branch out: release the upstream and reset so a fresh run
            // can reopen the connector from scratch.
            inner.input.close()?;
            inner.input_opened = false;
            inner.input_exhausted = false;
            inner.buffer.clear();
        }
        self.output_schema = None;
        Ok(())
    }

    fn output_schema(&self) -> Result<&Schema, OpError> {
        self.output_schema
            .as_ref()
            .ok_or_else(|| OpError::Config("output schema requested before open".into()))
    }
}
