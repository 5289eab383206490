//! Request validation.
//!
//! Names are already canonical when a request is built, so the only shape
//! check left is the slot count.

use crate::error::ValidationError;
use crate::ir::operations::Request;

impl Request {
    /// Validates this request's arity.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let arity = self.operation.arity();
        if arity.admits(self.names.len()) {
            return Ok(());
        }
        Err(ValidationError::WrongArity {
            operation: self.operation.to_string(),
            expected: arity.to_string(),
            actual: self.names.len(),
        })
    }
}
