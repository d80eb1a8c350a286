//! In-memory tuple source.
//!
//! Stand-in for the scanner collaborators (file/index readers) that live
//! outside this core: anything implementing [`Operator`] composes the same
//! way. Rewinds to the first tuple on reopen.

use textflow_core::prelude::{Schema, Tuple};

use crate::traits::{OpError, Operator, OperatorState};

pub struct TupleSource {
    schema: Schema,
    tuples: Vec<Tuple>,
    position: usize,
    state: OperatorState,
}

impl TupleSource {
    /// Build a source over pre-materialized tuples. Every tuple must carry
    /// exactly the declared schema.
    pub fn new(schema: Schema, tuples: Vec<Tuple>) -> Result<Self, OpError> {
        for (i, tuple) in tuples.iter().enumerate() {
            if tuple.schema() != &schema {
                return Err(OpError::Config(format!(
                    "tuple {} does not match the declared source schema",
                    i
                )));
            }
        }
        Ok(Self {
            schema,
            tuples,
            position: 0,
            state: OperatorState::Closed,
        })
    }
}

impl Operator for TupleSource {
    fn name(&self) -> &'static str {
        "tuple_source"
    }

    fn transform_schema(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        if !input_schemas.is_empty() {
            return Err(OpError::Schema(format!(
                "tuple_source expects no input schemas, got {}",
                input_schemas.len()
            )));
        }
        Ok(self.schema.clone())
    }

    fn open(&mut self) -> Result<(), OpError> {
        if self.state == OperatorState::Opened {
            return Ok(());
        }
        self.position = 0;
        self.state = OperatorState::Opened;
        Ok(())
    }

    fn pull(&mut self) -> Result<Option<Tuple>, OpError> {
        if self.state != OperatorState::Opened {
            return Err(OpError::Config(
                "pull called on a closed tuple_source".into(),
            ));
        }
        if self.position >= self.tuples.len() {
            return Ok(None);
        }
        let tuple = self.tuples[self.position].clone();
        self.position += 1;
        Ok(Some(tuple))
    }

    fn close(&mut self) -> Result<(), OpError> {
        self.state = OperatorState::Closed;
        Ok(())
    }

    fn output_schema(&self) -> Result<&Schema, OpError> {
        if self.state != OperatorState::Opened {
            return Err(OpError::Config(
                "output schema requested before open".into(),
            ));
        }
        Ok(&self.schema)
    }
}
