use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::PortError;

use super::value::Value;

/// Type tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
}

impl ValueType {
    /// Get the display name of this type
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
            ValueType::List => "list",
            ValueType::Map => "map",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(ValueType::Null),
            "bool" => Ok(ValueType::Bool),
            "int" => Ok(ValueType::Int),
            "float" => Ok(ValueType::Float),
            "str" => Ok(ValueType::Str),
            "list" => Ok(ValueType::List),
            "map" => Ok(ValueType::Map),
            other => Err(format!("unknown value type '{}'", other)),
        }
    }
}

/// Set of acceptable value types for a port
///
/// A single type or a tuple of alternatives, never empty. Membership is
/// checked on the exact type tag, values are never coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ValidTypeRepr", into = "ValidTypeRepr")]
pub struct ValidType {
    types: Vec<ValueType>,
}

impl ValidType {
    /// Create a constraint accepting exactly one type
    pub fn of(value_type: ValueType) -> Self {
        Self {
            types: vec![value_type],
        }
    }

    /// Create a constraint accepting any of the given types
    ///
    /// Duplicates are dropped. Fails when no type is given.
    pub fn any_of(types: impl IntoIterator<Item = ValueType>) -> Result<Self, PortError> {
        let mut unique = Vec::new();
        for value_type in types {
            if !unique.contains(&value_type) {
                unique.push(value_type);
            }
        }
        if unique.is_empty() {
            return Err(PortError::EmptyValidType);
        }
        Ok(Self { types: unique })
    }

    /// Check whether a value is an instance of one of the accepted types
    pub fn accepts(&self, value: &Value) -> bool {
        self.types.contains(&value.value_type())
    }

    pub fn types(&self) -> &[ValueType] {
        &self.types
    }
}

impl fmt::Display for ValidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.types.as_slice() {
            [single] => write!(f, "{}", single),
            many => {
                let names: Vec<&str> = many.iter().map(|t| t.name()).collect();
                write!(f, "({})", names.join(", "))
            }
        }
    }
}

impl From<ValueType> for ValidType {
    fn from(value_type: ValueType) -> Self {
        ValidType::of(value_type)
    }
}

macro_rules! impl_from_type_array {
    ($($n:literal),*) => {
        $(
            impl From<[ValueType; $n]> for ValidType {
                fn from(types: [ValueType; $n]) -> Self {
                    let mut unique = Vec::with_capacity($n);
                    for value_type in types {
                        if !unique.contains(&value_type) {
                            unique.push(value_type);
                        }
                    }
                    ValidType { types: unique }
                }
            }
        )*
    };
}

// Non-empty arrays only, so the conversion cannot produce an empty set
impl_from_type_array!(1, 2, 3, 4, 5, 6, 7);

impl TryFrom<Vec<ValueType>> for ValidType {
    type Error = PortError;

    fn try_from(types: Vec<ValueType>) -> Result<Self, Self::Error> {
        ValidType::any_of(types)
    }
}

/// Serialized form: a bare type name or a list of names
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValidTypeRepr {
    One(ValueType),
    Many(Vec<ValueType>),
}

impl TryFrom<ValidTypeRepr> for ValidType {
    type Error = PortError;

    fn try_from(repr: ValidTypeRepr) -> Result<Self, Self::Error> {
        match repr {
            ValidTypeRepr::One(value_type) => Ok(ValidType::of(value_type)),
            ValidTypeRepr::Many(types) => ValidType::any_of(types),
        }
    }
}

impl From<ValidType> for ValidTypeRepr {
    fn from(valid_type: ValidType) -> Self {
        match valid_type.types.as_slice() {
            [single] => ValidTypeRepr::One(*single),
            _ => ValidTypeRepr::Many(valid_type.types),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_exact_tag_only() {
        let ints = ValidType::of(ValueType::Int);
        assert!(ints.accepts(&Value::Int(1)));
        assert!(!ints.accepts(&Value::Float(1.0)));
        assert!(!ints.accepts(&Value::Bool(true)));
    }

    #[test]
    fn test_tuple_of_types() {
        let numeric = ValidType::from([ValueType::Int, ValueType::Float, ValueType::Int]);
        assert_eq!(numeric.types().len(), 2);
        assert!(numeric.accepts(&Value::Float(0.5)));
        assert_eq!(numeric.to_string(), "(int, float)");
        assert_eq!(ValidType::of(ValueType::Str).to_string(), "str");
    }

    #[test]
    fn test_empty_type_set_is_rejected() {
        assert_eq!(ValidType::any_of(Vec::<ValueType>::new()), Err(PortError::EmptyValidType));
        assert_eq!(ValidType::try_from(Vec::<ValueType>::new()), Err(PortError::EmptyValidType));
        assert!(serde_json::from_str::<ValidType>("[]").is_err());
        assert_eq!(
            ValidType::try_from(vec![ValueType::Int]),
            Ok(ValidType::of(ValueType::Int))
        );
    }

    #[test]
    fn test_parse_and_deserialize() {
        assert_eq!("map".parse::<ValueType>(), Ok(ValueType::Map));
        assert!("integer".parse::<ValueType>().is_err());

        let one: ValidType = serde_json::from_str("\"str\"").unwrap();
        assert_eq!(one, ValidType::of(ValueType::Str));

        let many: ValidType = serde_json::from_str("[\"int\", \"null\"]").unwrap();
        assert!(many.accepts(&Value::Null));
        assert_eq!(serde_json::to_string(&many).unwrap(), "[\"int\",\"null\"]");
    }
}
