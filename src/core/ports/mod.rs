pub mod composition;
pub mod description;
pub mod input_port;
pub mod namespace;
pub mod node;
pub mod options;
pub mod output_port;
pub mod validator;
pub mod value_spec;

// Re-export commonly used types
pub use description::{Description, NamespaceAttrs, NamespaceDescription, PortDescription, ATTRS_KEY};
pub use input_port::{InputPort, InputPortBuilder};
pub use namespace::PortNamespace;
pub use node::{Port, PortNode};
pub use options::{NamespaceOptions, PortFilter, NAMESPACE_PROPERTIES};
pub use output_port::OutputPort;
pub use validator::{NamespaceValidator, Validator, Verdict};
pub use value_spec::ValueSpec;
