use serde::{Deserialize, Serialize};

/// A bare name: a collection alias, a property accessed with dot syntax, or a function name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlIdentifier {
    pub value: String,
}

impl SqlIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

/// The key of a property in an object-create expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlPropertyName {
    pub value: String,
}

impl SqlPropertyName {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

/// A query parameter, including its leading `@`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlParameter {
    pub name: String,
}

impl SqlParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
