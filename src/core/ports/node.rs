use crate::core::errors::ValidationError;
use crate::core::values::{Slot, Value};

use super::description::Description;
use super::input_port::InputPort;
use super::namespace::PortNamespace;
use super::output_port::OutputPort;

/// Capability shared by every schema node
pub trait Port {
    fn name(&self) -> &str;

    fn required(&self) -> bool;

    /// Validate the value supplied for this node
    fn validate(&self, value: Slot<&Value>) -> Result<(), ValidationError>;

    fn describe(&self) -> Description;
}

/// A child of a port namespace
#[derive(Debug, Clone)]
pub enum PortNode {
    Input(InputPort),
    Output(OutputPort),
    Namespace(PortNamespace),
}

impl PortNode {
    /// Check if this node is a nested namespace
    pub fn is_namespace(&self) -> bool {
        matches!(self, PortNode::Namespace(_))
    }

    pub fn as_namespace(&self) -> Option<&PortNamespace> {
        match self {
            PortNode::Namespace(namespace) => Some(namespace),
            _ => None,
        }
    }

    pub fn as_namespace_mut(&mut self) -> Option<&mut PortNamespace> {
        match self {
            PortNode::Namespace(namespace) => Some(namespace),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<&InputPort> {
        match self {
            PortNode::Input(port) => Some(port),
            _ => None,
        }
    }

    pub fn as_output(&self) -> Option<&OutputPort> {
        match self {
            PortNode::Output(port) => Some(port),
            _ => None,
        }
    }

    /// Default value of the node, if it carries one
    pub fn default_value(&self) -> Option<&Value> {
        match self {
            PortNode::Input(port) => port.default_value().ok(),
            PortNode::Output(_) => None,
            PortNode::Namespace(namespace) => namespace.default_value().as_option(),
        }
    }
}

impl Port for PortNode {
    fn name(&self) -> &str {
        match self {
            PortNode::Input(port) => port.name(),
            PortNode::Output(port) => port.name(),
            PortNode::Namespace(namespace) => namespace.name(),
        }
    }

    fn required(&self) -> bool {
        match self {
            PortNode::Input(port) => port.required(),
            PortNode::Output(port) => port.required(),
            PortNode::Namespace(namespace) => namespace.required(),
        }
    }

    fn validate(&self, value: Slot<&Value>) -> Result<(), ValidationError> {
        match self {
            PortNode::Input(port) => port.validate(value),
            PortNode::Output(port) => port.validate(value),
            PortNode::Namespace(namespace) => match value {
                Slot::Unspecified => namespace.validate(None),
                Slot::Specified(Value::Map(values)) => namespace.validate(Some(values)),
                Slot::Specified(other) => Err(ValidationError::NotAMapping {
                    namespace: namespace.name().to_string(),
                    actual: other.value_type(),
                }),
            },
        }
    }

    fn describe(&self) -> Description {
        match self {
            PortNode::Input(port) => Description::Port(port.describe()),
            PortNode::Output(port) => Description::Port(port.describe()),
            PortNode::Namespace(namespace) => Description::Namespace(namespace.describe()),
        }
    }
}

impl From<InputPort> for PortNode {
    fn from(port: InputPort) -> Self {
        PortNode::Input(port)
    }
}

impl From<OutputPort> for PortNode {
    fn from(port: OutputPort) -> Self {
        PortNode::Output(port)
    }
}

impl From<PortNamespace> for PortNode {
    fn from(namespace: PortNamespace) -> Self {
        PortNode::Namespace(namespace)
    }
}
