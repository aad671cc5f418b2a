//! Self-validating scalar values.

use std::fmt;

use crate::error::ValidationError;
use crate::rule::Rule;

/// A value that always satisfies its [`Rule`].
#[derive(Clone)]
pub struct ValidValue<T> {
    value: T,
    rule: Rule<T>,
}

impl<T> ValidValue<T> {
    /// Store `value` if `rule` accepts it.
    pub fn new(value: T, rule: Rule<T>) -> Result<Self, ValidationError> {
        if !rule.is_satisfied_by(&value) {
            return Err(ValidationError::InvalidValue);
        }

        Ok(Self { value, rule })
    }

    /// Current value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Replace the value. The previous one is kept on error.
    pub fn set_value(&mut self, candidate: T) -> Result<(), ValidationError> {
        if !self.rule.is_satisfied_by(&candidate) {
            return Err(ValidationError::InvalidValue);
        }

        self.value = candidate;
        Ok(())
    }

    /// Consume the wrapper and return the value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for ValidValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidValue").field(&self.value).finish()
    }
}

impl<T: PartialEq> PartialEq for ValidValue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_empty() -> Rule<String> {
        Rule::new(|s: &String| !s.is_empty())
    }

    #[test]
    fn test_new() {
        let value = ValidValue::new("admin".to_string(), non_empty()).unwrap();
        assert_eq!(value.value(), "admin");

        assert_eq!(
            ValidValue::new(String::new(), non_empty()).unwrap_err(),
            ValidationError::InvalidValue
        );
    }

    #[test]
    fn test_set_value() {
        let mut value = ValidValue::new("admin".to_string(), non_empty()).unwrap();

        value.set_value("root".into()).unwrap();
        assert_eq!(value.value(), "root");

        assert!(value.set_value(String::new()).is_err());
        assert_eq!(value.into_inner(), "root");
    }
}
