pub mod slot;
pub mod value;
pub mod value_type;

// Re-export all public types
pub use slot::Slot;
pub use value::{value_map, Value, ValueMap};
pub use value_type::{ValidType, ValueType};
