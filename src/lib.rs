//! Typed port and namespace schemas for validating process inputs and outputs

pub mod core;

// Re-export commonly used types
pub use crate::core::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
pub use crate::core::errors::{PortError, SpecError, ValidationError};
pub use crate::core::execution::{validate_batch, BatchValidator, ConcurrencyMode, ValidationConfig};
pub use crate::core::ports::{
    Description, InputPort, NamespaceOptions, NamespaceValidator, OutputPort, Port, PortFilter, PortNamespace,
    PortNode, Validator, ValueSpec, Verdict,
};
pub use crate::core::process_spec::{Emission, ProcessSpec, SpecDescription};
pub use crate::core::values::{value_map, Slot, ValidType, Value, ValueMap, ValueType};
