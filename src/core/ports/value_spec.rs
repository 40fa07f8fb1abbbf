use crate::core::errors::ValidationError;
use crate::core::values::{Slot, ValidType, Value};

use super::description::PortDescription;
use super::validator::{Validator, Verdict};

/// Specification of a single named value
///
/// Holds whether the value is required, which types are valid, the help
/// text and an optional custom validator.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    name: String,
    valid_type: Option<ValidType>,
    help: Option<String>,
    required: bool,
    validator: Option<Validator>,
}

impl ValueSpec {
    /// Create a new required value spec with no constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            valid_type: None,
            help: None,
            required: true,
            validator: None,
        }
    }

    /// Restrict the value to the given types
    pub fn with_valid_type(mut self, valid_type: impl Into<ValidType>) -> Self {
        self.valid_type = Some(valid_type.into());
        self
    }

    /// Set the help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set whether a value must be supplied
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Attach a custom validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Get the value name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the type constraint, if any
    pub fn valid_type(&self) -> Option<&ValidType> {
        self.valid_type.as_ref()
    }

    /// Replace the type constraint
    pub fn set_valid_type(&mut self, valid_type: Option<ValidType>) {
        self.valid_type = valid_type;
    }

    /// Get the help text, if any
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Replace the help text
    pub fn set_help(&mut self, help: Option<String>) {
        self.help = help;
    }

    /// Check if a value must be supplied
    pub fn required(&self) -> bool {
        self.required
    }

    /// Change the required flag
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Get the custom validator, if any
    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Replace the custom validator
    pub fn set_validator(&mut self, validator: Option<Validator>) {
        self.validator = validator;
    }

    /// Validate a single value against this spec
    ///
    /// Checks, in order: presence, type membership, then the custom
    /// validator. The first failing check decides the result.
    pub fn validate(&self, value: Slot<&Value>) -> Result<(), ValidationError> {
        let value = match value {
            Slot::Unspecified if self.required => {
                return Err(ValidationError::RequiredMissing {
                    port: self.name.clone(),
                })
            }
            Slot::Unspecified => return Ok(()),
            Slot::Specified(value) => value,
        };

        if let Some(valid_type) = &self.valid_type {
            if !valid_type.accepts(value) {
                return Err(ValidationError::TypeMismatch {
                    port: self.name.clone(),
                    actual: value.value_type(),
                    expected: valid_type.clone(),
                });
            }
        }

        if let Some(validator) = &self.validator {
            match validator.check(value) {
                Verdict::Pass | Verdict::Report(true, _) => {}
                Verdict::Fail => {
                    return Err(ValidationError::ValidatorRejected {
                        port: self.name.clone(),
                    })
                }
                Verdict::Report(false, message) => {
                    return Err(ValidationError::Custom { message })
                }
            }
        }

        Ok(())
    }

    /// Snapshot of the stringified attributes
    pub fn describe(&self) -> PortDescription {
        PortDescription {
            name: self.name.clone(),
            required: self.required.to_string(),
            valid_type: self.valid_type.as_ref().map(|t| t.to_string()),
            help: self
                .help
                .as_ref()
                .filter(|h| !h.is_empty())
                .map(|h| h.trim().to_string()),
            default: None,
        }
    }
}
