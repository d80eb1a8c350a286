//! Single-input operator template.
//!
//! Filtering/annotating operators share one control skeleton: open the
//! upstream, fix the output schema, then loop "pull one, process one" until
//! the processor accepts a tuple or the upstream runs dry. Implementations
//! supply the hooks via [`TupleProcessor`]; [`UnaryOperator`] owns the
//! lifecycle so `process_one` is never invoked before `set_up` and each
//! upstream tuple is pulled at most once.

use textflow_core::prelude::Schema;
use textflow_core::tuple::Tuple;

use crate::traits::{expect_one_input, BoxedOperator, OpError, Operator, OperatorState};

/// Hooks for operators that consume a single upstream stream.
pub trait TupleProcessor: Send {
    /// Stable name, surfaced by the wrapping operator.
    fn name(&self) -> &'static str;

    /// Pure schema transform; callable before anything is opened.
    fn transform_schema(&self, input_schema: &Schema) -> Result<Schema, OpError>;

    /// Compile per-run state. Runs once during `open`, after the upstream
    /// opened and the input schema is known.
    fn set_up(&mut self, input_schema: &Schema) -> Result<(), OpError> {
        let _ = input_schema;
        Ok(())
    }

    /// Process one upstream tuple. `None` means "discard this tuple, keep
    /// scanning" — not an error and not end-of-stream.
    fn process_one(&mut self, tuple: &Tuple) -> Result<Option<Tuple>, OpError>;

    /// Release compiled state. Runs once during `close`, after the upstream
    /// closed.
    fn clean_up(&mut self) -> Result<(), OpError> {
        Ok(())
    }
}

/// Operator skeleton around a [`TupleProcessor`].
pub struct UnaryOperator<P: TupleProcessor> {
    processor: P,
    input: Option<BoxedOperator>,
    state: OperatorState,
    output_schema: Option<Schema>,
}

impl<P: TupleProcessor> UnaryOperator<P> {
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            input: None,
            state: OperatorState::Closed,
            output_schema: None,
        }
    }

    pub fn with_input(processor: P, input: BoxedOperator) -> Self {
        let mut op = Self::new(processor);
        op.input = Some(input);
        op
    }

    /// Attach the upstream operator. Only legal while closed; a live
    /// pipeline must not be rewired.
    pub fn set_input(&mut self, input: BoxedOperator) -> Result<(), OpError> {
        if self.state == OperatorState::Opened {
            return Err(OpError::Config(format!(
                "cannot attach an input to '{}' after open",
                self.processor.name()
            )));
        }
        self.input = Some(input);
        Ok(())
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }
}

impl<P: TupleProcessor> Operator for UnaryOperator<P> {
    fn name(&self) -> &'static str {
        self.processor.name()
    }

    fn transform_schema(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        let input = expect_one_input(self.processor.name(), input_schemas)?;
        self.processor.transform_schema(input)
    }

    fn open(&mut self) -> Result<(), OpError> {
        if self.state == OperatorState::Opened {
            return Ok(());
        }
        let input = self.input.as_mut().ok_or_else(|| {
            OpError::Config(format!(
                "'{}' has no input operator attached",
                self.processor.name()
            ))
        })?;
        input.open()?;
        let input_schema = input.output_schema()?.clone();
        let output_schema = self.processor.transform_schema(&input_schema)?;
        self.processor.set_up(&input_schema)?;
        self.output_schema = Some(output_schema);
        self.state = OperatorState::Opened;
        Ok(())
    }

    fn pull(&mut self) -> Result<Option<Tuple>, OpError> {
        if self.state != OperatorState::Opened {
            return Err(OpError::Config(format!(
                "pull called on '{}' while closed",
                self.processor.name()
            )));
        }
        // `open` guarantees the input is present.
        let input = self
            .input
            .as_mut()
            .ok_or_else(|| OpError::Config("input operator detached mid-run".into()))?;
        loop {
            match input.pull()? {
                None => return Ok(None),
                Some(tuple) => {
                    if let Some(out) = self.processor.process_one(&tuple)? {
                        return Ok(Some(out));
                    }
                }
            }
        }
    }

    fn close(&mut self) -> Result<(), OpError> {
        if self.state == OperatorState::Closed {
            return Ok(());
        }
        if let Some(input) = self.input.as_mut() {
            input.close()?;
        }
        self.processor.clean_up()?;
        self.state = OperatorState::Closed;
        Ok(())
    }

    fn output_schema(&self) -> Result<&Schema, OpError> {
        self.output_schema
            .as_ref()
            .filter(|_| self.state == OperatorState::Opened)
            .ok_or_else(|| OpError::Config("output schema requested before open".into()))
    }
}
