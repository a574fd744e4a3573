//! Error types for expression construction and compilation.

use thiserror::Error;

/// Errors raised while building or compiling an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeaveError {
    /// No handler is registered for the kind or any kind it generalizes.
    #[error("no compile handler for kind '{kind}'")]
    NoHandler {
        /// The most specific kind of the expression.
        kind: &'static str,
    },

    /// The attribute is absent from every active scope.
    #[error("compile state has no attribute '{name}'")]
    NoSuchAttribute {
        /// Attribute name.
        name: String,
    },

    /// The attribute exists but holds a value of another shape.
    #[error("compile state attribute '{name}' is not a {expected}")]
    AttributeType {
        /// Attribute name.
        name: String,
        /// The shape the caller asked for.
        expected: &'static str,
    },

    /// An expression node was built with invalid arguments.
    #[error("cannot construct '{kind}': {message}")]
    Construction {
        /// Kind being constructed.
        kind: &'static str,
        /// What was wrong with the arguments.
        message: String,
    },

    /// The root scope cannot be popped or viewed past.
    #[error("the root scope of a compile state cannot be removed")]
    RootScope,

    /// A handler received a node whose representation it cannot read.
    #[error("handler expected a {expected} node, got kind '{kind}'")]
    UnexpectedNode {
        /// Kind of the node that was received.
        kind: &'static str,
        /// Rust type the handler reads.
        expected: &'static str,
    },
}

impl WeaveError {
    /// Creates a construction error for `kind`.
    #[must_use]
    pub fn construction(kind: &'static str, message: impl Into<String>) -> Self {
        Self::Construction {
            kind,
            message: message.into(),
        }
    }
}

/// Result type alias for sqlweave operations.
pub type Result<T> = std::result::Result<T, WeaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = WeaveError::NoHandler { kind: "select" };
        assert_eq!(err.to_string(), "no compile handler for kind 'select'");

        let err = WeaveError::NoSuchAttribute {
            name: String::from("foo"),
        };
        assert_eq!(err.to_string(), "compile state has no attribute 'foo'");

        let err = WeaveError::construction("sqrt", "expected exactly 1 argument, got 2");
        assert_eq!(
            err.to_string(),
            "cannot construct 'sqrt': expected exactly 1 argument, got 2"
        );
    }
}
