//! User domain and service port.

mod contract;
mod service;

pub use contract::*;
pub use service::*;

use std::fmt;

use crate::error::ValidationError;
use crate::rule::Rule;
use crate::valid::ValidValue;

/// Name chosen by a user.
#[derive(Clone, Debug, PartialEq)]
pub struct UserName(ValidValue<String>);

impl UserName {
    /// Create a [`UserName`] with the default policy.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_rule(name, Rule::any())
    }

    /// Create a [`UserName`] checked by `rule`.
    pub fn with_rule(
        name: impl Into<String>,
        rule: Rule<String>,
    ) -> Result<Self, ValidationError> {
        ValidValue::new(name.into(), rule).map(Self)
    }

    pub fn value(&self) -> &str {
        self.0.value()
    }

    pub fn set_value(
        &mut self,
        name: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.0.set_value(name.into())
    }
}

/// Secret of a user.
#[derive(Clone, PartialEq)]
pub struct UserPassword(ValidValue<String>);

impl UserPassword {
    /// Create a [`UserPassword`] with the default policy.
    pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_rule(password, Rule::any())
    }

    /// Create a [`UserPassword`] checked by `rule`.
    pub fn with_rule(
        password: impl Into<String>,
        rule: Rule<String>,
    ) -> Result<Self, ValidationError> {
        ValidValue::new(password.into(), rule).map(Self)
    }

    pub fn value(&self) -> &str {
        self.0.value()
    }

    pub fn set_value(
        &mut self,
        password: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.0.set_value(password.into())
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([redacted])")
    }
}

/// User account.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    id: String,
    name: UserName,
    password: UserPassword,
}

impl User {
    pub fn new(id: impl Into<String>, name: UserName, password: UserPassword) -> Self {
        Self {
            id: id.into(),
            name,
            password,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn password(&self) -> &UserPassword {
        &self.password
    }

    /// Rename user. Name is unchanged if refused.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name.set_value(name)
    }

    /// Change password. Password is unchanged if refused.
    pub fn set_password(
        &mut self,
        password: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.password.set_value(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "7f1c",
            UserName::new("alice").unwrap(),
            UserPassword::new("hunter2").unwrap(),
        )
    }

    #[test]
    fn test_default_policy_accepts_everything() {
        assert!(UserName::new("").is_ok());
        assert!(UserPassword::new("").is_ok());
    }

    #[test]
    fn test_custom_policy() {
        let min_length = Rule::new(|p: &String| p.len() >= 6);

        assert_eq!(
            UserPassword::with_rule("short", min_length.clone()).unwrap_err(),
            ValidationError::InvalidValue
        );

        let mut password = UserPassword::with_rule("long enough", min_length).unwrap();
        assert!(password.set_value("tiny").is_err());
        assert_eq!(password.value(), "long enough");
    }

    #[test]
    fn test_user_update() {
        let mut user = user();

        user.set_name("bob").unwrap();
        user.set_password("correct horse").unwrap();

        assert_eq!(user.id(), "7f1c");
        assert_eq!(user.name().value(), "bob");
        assert_eq!(user.password().value(), "correct horse");
    }

    #[test]
    fn test_password_is_not_printed() {
        assert!(!format!("{:?}", user()).contains("hunter2"));
    }
}
