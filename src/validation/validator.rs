// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed entry point: contract check, then deserialize, then resource rules.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{FieldContract, ValidationError};

/// A request payload bound to its field contract.
pub trait Contracted: DeserializeOwned {
    const CONTRACT: &'static FieldContract;

    /// Resource rules beyond the contract; may normalize values.
    fn refine(self) -> Result<Self, ValidationError> {
        Ok(self)
    }
}

/// Validate `body` against `T::CONTRACT` and decode it.
pub fn validate<T: Contracted>(body: &Value) -> Result<T, ValidationError> {
    let object = body.as_object().ok_or(ValidationError::NotAnObject)?;
    T::CONTRACT.check(object)?;

    let payload: T = serde_json::from_value(body.clone()).map_err(|err| {
        tracing::debug!(resource = T::CONTRACT.resource, error = %err, "payload decode failed");
        ValidationError::Rule("Unprocessable Entity - Invalid value in data field")
    })?;
    payload.refine()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldSpec;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Greeting {
        name: String,
    }

    impl Contracted for Greeting {
        const CONTRACT: &'static FieldContract = &FieldContract {
            resource: "greeting",
            fields: &[FieldSpec::text("name")],
        };

        fn refine(mut self) -> Result<Self, ValidationError> {
            self.name = self.name.trim().to_string();
            if self.name == "nobody" {
                return Err(ValidationError::Rule("nobody is not allowed"));
            }
            Ok(self)
        }
    }

    #[test]
    fn non_object_body_is_rejected() {
        for body in [json!([]), json!("name"), json!(null)] {
            assert!(matches!(
                validate::<Greeting>(&body),
                Err(ValidationError::NotAnObject)
            ));
        }
    }

    #[test]
    fn refine_runs_after_contract() {
        let greeting = validate::<Greeting>(&json!({"name": "  ada "})).unwrap();
        assert_eq!(greeting.name, "ada");

        let err = validate::<Greeting>(&json!({"name": "nobody"})).unwrap_err();
        assert_eq!(err.to_string(), "nobody is not allowed");

        // Contract failures never reach refine.
        let err = validate::<Greeting>(&json!({"name": ""})).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField { .. }));
    }
}
