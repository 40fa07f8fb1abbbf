/// A value slot that may have been left unspecified
///
/// `Unspecified` means the caller supplied nothing at all. It is distinct
/// from a supplied [`Value::Null`](super::Value::Null).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<T> {
    Unspecified,
    Specified(T),
}

impl<T> Slot<T> {
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Slot::Unspecified)
    }

    pub fn is_specified(&self) -> bool {
        matches!(self, Slot::Specified(_))
    }

    /// Borrow the contents of the slot
    pub fn as_ref(&self) -> Slot<&T> {
        match self {
            Slot::Unspecified => Slot::Unspecified,
            Slot::Specified(value) => Slot::Specified(value),
        }
    }

    /// Convert into an `Option`, losing the sentinel distinction
    pub fn into_option(self) -> Option<T> {
        match self {
            Slot::Unspecified => None,
            Slot::Specified(value) => Some(value),
        }
    }

    pub fn as_option(&self) -> Option<&T> {
        self.as_ref().into_option()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Unspecified
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Slot::Specified(value),
            None => Slot::Unspecified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::Value;

    #[test]
    fn test_unspecified_is_not_null() {
        let null: Slot<Value> = Slot::Specified(Value::Null);
        assert!(null.is_specified());
        assert_ne!(null, Slot::Unspecified);
        assert!(Slot::<Value>::default().is_unspecified());
    }

    #[test]
    fn test_option_conversions() {
        let slot: Slot<i32> = Some(3).into();
        assert_eq!(slot.as_option(), Some(&3));
        assert_eq!(Slot::<i32>::from(None).into_option(), None);
    }
}
