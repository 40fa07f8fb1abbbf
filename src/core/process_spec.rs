use serde::Serialize;

use crate::core::errors::{PortError, SpecError, ValidationError};
use crate::core::path;
use crate::core::ports::{
    InputPort, NamespaceDescription, NamespaceOptions, OutputPort, Port, PortFilter, PortNamespace, PortNode,
};
use crate::core::values::{Slot, Value, ValueMap};

/// How an emitted output was matched to the output schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// The output name is an explicitly declared port
    Declared,
    /// The output was accepted by the dynamic rules of its namespace
    Dynamic,
}

/// Serializable description of a whole process spec
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecDescription {
    pub inputs: NamespaceDescription,
    pub outputs: NamespaceDescription,
}

/// Input and output contracts of a process type
///
/// Built once when the process type is defined, then sealed. A sealed
/// spec still validates but refuses every mutation.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    inputs: PortNamespace,
    outputs: PortNamespace,
    sealed: bool,
}

impl ProcessSpec {
    pub fn new() -> Self {
        Self {
            inputs: PortNamespace::new("inputs"),
            outputs: PortNamespace::new("outputs"),
            sealed: false,
        }
    }

    pub fn inputs(&self) -> &PortNamespace {
        &self.inputs
    }

    pub fn outputs(&self) -> &PortNamespace {
        &self.outputs
    }

    pub fn inputs_mut(&mut self) -> Result<&mut PortNamespace, PortError> {
        self.ensure_unsealed()?;
        Ok(&mut self.inputs)
    }

    pub fn outputs_mut(&mut self) -> Result<&mut PortNamespace, PortError> {
        self.ensure_unsealed()?;
        Ok(&mut self.outputs)
    }

    /// Prevent any further modification of the spec
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Declare an input port at a (possibly dotted) path
    pub fn input(&mut self, path: &str, port: InputPort) -> Result<(), PortError> {
        let inputs = self.inputs_mut()?;
        insert_at(inputs, path, port.into())
    }

    /// Declare an output port at a (possibly dotted) path
    pub fn output(&mut self, path: &str, port: OutputPort) -> Result<(), PortError> {
        let outputs = self.outputs_mut()?;
        insert_at(outputs, path, port.into())
    }

    pub fn input_namespace(&mut self, path: &str, options: NamespaceOptions) -> Result<&mut PortNamespace, PortError> {
        self.inputs_mut()?.create_port_namespace(path, options)
    }

    pub fn output_namespace(&mut self, path: &str, options: NamespaceOptions) -> Result<&mut PortNamespace, PortError> {
        self.outputs_mut()?.create_port_namespace(path, options)
    }

    /// Expose the inputs of another process spec as inputs of this one
    ///
    /// With a `namespace` the ports land in that (created on demand) sub
    /// namespace, otherwise in the input root.
    pub fn expose_inputs(
        &mut self,
        other: &ProcessSpec,
        namespace: Option<&str>,
        filter: &PortFilter,
        options: NamespaceOptions,
    ) -> Result<Vec<String>, PortError> {
        let target = match namespace {
            Some(sub) => self.input_namespace(sub, NamespaceOptions::new())?,
            None => self.inputs_mut()?,
        };
        target.absorb(&other.inputs, filter, options)
    }

    /// Expose the outputs of another process spec as outputs of this one
    pub fn expose_outputs(
        &mut self,
        other: &ProcessSpec,
        namespace: Option<&str>,
        filter: &PortFilter,
        options: NamespaceOptions,
    ) -> Result<Vec<String>, PortError> {
        let target = match namespace {
            Some(sub) => self.output_namespace(sub, NamespaceOptions::new())?,
            None => self.outputs_mut()?,
        };
        target.absorb(&other.outputs, filter, options)
    }

    /// Validate the inputs supplied to an invocation
    pub fn validate_inputs(&self, inputs: Option<&ValueMap>) -> Result<(), ValidationError> {
        self.inputs.validate(inputs)
    }

    /// Check the outputs recorded by a finished invocation
    ///
    /// `outputs` is keyed by output path. Each declared output port is
    /// validated against its value.
    pub fn validate_outputs(&self, outputs: &ValueMap) -> Result<(), SpecError> {
        let nested = path::nest(outputs)?;
        for (name, port) in self.outputs.iter() {
            let value = nested.get(name).map_or(Slot::Unspecified, Slot::Specified);
            port.validate(value)?;
        }
        Ok(())
    }

    /// Validate a single output as it is emitted
    ///
    /// A declared port validates the value itself. Any other name is checked
    /// against the dynamic rules of its parent namespace.
    pub fn validate_output(&self, output_path: &str, value: &Value) -> Result<Emission, SpecError> {
        let segments = path::split(output_path)?;
        let Some((port_name, parents)) = segments.split_last() else {
            return Err(PortError::EmptyPath.into());
        };

        let mut namespace = &self.outputs;
        for segment in parents {
            namespace = match namespace.get(segment) {
                Some(PortNode::Namespace(child)) => child,
                Some(_) => {
                    return Err(PortError::NotANamespace {
                        namespace: namespace.name().to_string(),
                        port: segment.to_string(),
                    }
                    .into())
                }
                None => {
                    return Err(PortError::PortNotFound {
                        namespace: namespace.name().to_string(),
                        port: segment.to_string(),
                    }
                    .into())
                }
            };
        }

        match namespace.get(port_name) {
            Some(port) => {
                port.validate(Slot::Specified(value))?;
                Ok(Emission::Declared)
            }
            None => {
                let mut single = ValueMap::new();
                single.insert(port_name.to_string(), value.clone());
                namespace.validate_dynamic_ports(&single)?;
                Ok(Emission::Dynamic)
            }
        }
    }

    pub fn describe(&self) -> SpecDescription {
        SpecDescription {
            inputs: self.inputs.describe(),
            outputs: self.outputs.describe(),
        }
    }

    fn ensure_unsealed(&self) -> Result<(), PortError> {
        if self.sealed {
            return Err(PortError::Sealed);
        }
        Ok(())
    }
}

impl Default for ProcessSpec {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_at(root: &mut PortNamespace, port_path: &str, port: PortNode) -> Result<(), PortError> {
    let segments = path::split(port_path)?;
    let Some((name, parents)) = segments.split_last() else {
        return Err(PortError::EmptyPath);
    };
    let target = if parents.is_empty() {
        root
    } else {
        root.create_port_namespace(&path::join(parents), NamespaceOptions::new())?
    };
    target.insert(*name, port)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::{value_map, ValueType};
    use serde_json::json;

    #[test]
    fn test_nested_input_declaration() {
        let mut spec = ProcessSpec::new();
        spec.input("options.depth", InputPort::builder("depth").default(1).build().unwrap())
            .unwrap();
        assert!(spec.inputs().get_port("options.depth").is_ok());
        assert!(spec.inputs().get_port("options").unwrap().is_namespace());
    }

    #[test]
    fn test_sealed_spec_refuses_changes() {
        let mut spec = ProcessSpec::new();
        spec.input("a", InputPort::new("a")).unwrap();
        spec.seal();

        assert_eq!(spec.input("b", InputPort::new("b")), Err(PortError::Sealed));
        assert!(spec.inputs_mut().is_err());
        assert!(spec.validate_inputs(Some(&value_map(json!({"a": 1})))).is_ok());
    }

    #[test]
    fn test_validate_output_dynamic_fallback() {
        let mut spec = ProcessSpec::new();
        spec.output("result", OutputPort::new("result").with_valid_type(ValueType::Int))
            .unwrap();
        spec.output_namespace(
            "extras",
            NamespaceOptions::new().valid_type(Some(ValueType::Str.into())),
        )
        .unwrap();

        assert_eq!(spec.validate_output("result", &Value::Int(1)), Ok(Emission::Declared));
        assert!(matches!(
            spec.validate_output("result", &Value::from("x")),
            Err(SpecError::Invalid(ValidationError::TypeMismatch { .. }))
        ));
        assert_eq!(
            spec.validate_output("extras.note", &Value::from("hi")),
            Ok(Emission::Dynamic)
        );
        assert!(matches!(
            spec.validate_output("extras.note", &Value::Int(3)),
            Err(SpecError::Invalid(ValidationError::DynamicTypeMismatch { .. }))
        ));
        assert!(matches!(
            spec.validate_output("unknown", &Value::Int(3)),
            Err(SpecError::Invalid(ValidationError::UnexpectedPorts { .. }))
        ));
        assert!(matches!(
            spec.validate_output("missing.note", &Value::Int(3)),
            Err(SpecError::Schema(PortError::PortNotFound { .. }))
        ));
        assert_eq!(
            spec.validate_output("result.inner", &Value::Int(3)),
            Err(SpecError::Schema(PortError::NotANamespace {
                namespace: "outputs".to_string(),
                port: "result".to_string(),
            }))
        );
    }

    #[test]
    fn test_validate_output_names_the_offending_segment() {
        let mut spec = ProcessSpec::new();
        spec.output("stats.count", OutputPort::new("total")).unwrap();

        assert_eq!(
            spec.validate_output("stats.count.inner", &Value::Int(1)),
            Err(SpecError::Schema(PortError::NotANamespace {
                namespace: "stats".to_string(),
                port: "count".to_string(),
            }))
        );
        assert_eq!(
            spec.validate_output("stats.extra.x", &Value::Int(1)),
            Err(SpecError::Schema(PortError::PortNotFound {
                namespace: "stats".to_string(),
                port: "extra".to_string(),
            }))
        );
    }

    #[test]
    fn test_validate_outputs_nests_dotted_keys() {
        let mut spec = ProcessSpec::new();
        spec.output("stats.count", OutputPort::new("count").with_valid_type(ValueType::Int))
            .unwrap();
        spec.output("log", OutputPort::new("log").with_required(false))
            .unwrap();

        assert!(spec.validate_outputs(&value_map(json!({"stats.count": 3}))).is_ok());
        assert!(matches!(
            spec.validate_outputs(&value_map(json!({"stats.count": "three"}))),
            Err(SpecError::Invalid(ValidationError::TypeMismatch { .. }))
        ));
        assert!(matches!(
            spec.validate_outputs(&ValueMap::new()),
            Err(SpecError::Invalid(ValidationError::RequiredMissing { .. }))
        ));
    }
}
