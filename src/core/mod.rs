pub mod diagnostics;
pub mod errors;
pub mod execution;
pub mod path;
pub mod ports;
pub mod process_spec;
pub mod values;
