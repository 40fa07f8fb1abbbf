//! Dotted path addressing for nested port namespaces
//!
//! `a.b.c` names the port `c` in namespace `b` in namespace `a`. The
//! separator is reserved and never appears inside a port name.

use crate::core::errors::PortError;
use crate::core::values::{Value, ValueMap};

/// Namespace separator in port paths
pub const SEPARATOR: char = '.';

/// Check that a name can be used as a single path segment
pub fn check_name(name: &str) -> Result<(), PortError> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(PortError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Split a path into its segments
pub fn split(path: &str) -> Result<Vec<&str>, PortError> {
    if path.is_empty() {
        return Err(PortError::EmptyPath);
    }
    let segments: Vec<&str> = path.split(SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(PortError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

/// Split off the first segment, returning the remainder if any
pub fn split_first(path: &str) -> Result<(&str, Option<&str>), PortError> {
    if path.is_empty() {
        return Err(PortError::EmptyPath);
    }
    let (head, rest) = match path.split_once(SEPARATOR) {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    if head.is_empty() || rest.is_some_and(str::is_empty) {
        return Err(PortError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok((head, rest))
}

/// Join segments with the separator
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let parts: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
    parts.join(&SEPARATOR.to_string())
}

/// Turn a flat map with dotted keys into nested maps
///
/// `{"a.b": 1, "c": 2}` becomes `{"a": {"b": 1}, "c": 2}`. Existing nested
/// maps are merged into. A key that is needed both as a value and as a
/// namespace fails.
pub fn nest(flat: &ValueMap) -> Result<ValueMap, PortError> {
    let mut nested = ValueMap::new();
    for (key, value) in flat {
        let segments = split(key)?;
        insert_nested(&mut nested, &segments, value.clone(), key)?;
    }
    Ok(nested)
}

fn insert_nested(
    target: &mut ValueMap,
    segments: &[&str],
    value: Value,
    full_path: &str,
) -> Result<(), PortError> {
    let collision = || PortError::PathCollision {
        path: full_path.to_string(),
    };

    match segments {
        [] => Ok(()),
        [last] => {
            if let Some(existing) = target.get_mut(*last) {
                return match (existing, value) {
                    (Value::Map(existing), Value::Map(incoming)) => {
                        for (key, inner) in incoming {
                            insert_nested(existing, &[key.as_str()], inner, full_path)?;
                        }
                        Ok(())
                    }
                    _ => Err(collision()),
                };
            }
            target.insert(last.to_string(), value);
            Ok(())
        }
        [head, rest @ ..] => {
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Map(ValueMap::new()));
            match entry {
                Value::Map(inner) => insert_nested(inner, rest, value, full_path),
                _ => Err(collision()),
            }
        }
    }
}
