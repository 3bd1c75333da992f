#![forbid(unsafe_code)]

//! Domain model for contiguous position lists.
//!
//! Nothing in this crate performs I/O. Records, field values and filter
//! conditions are plain data; the scope resolver and the shift planner are
//! pure functions over them. Storage adapters live in `rl_storage`.

pub mod condition;
pub mod config;
pub mod plan;
pub mod record;
pub mod scope;
pub mod value;

pub use condition::Condition;
pub use config::{ConfigError, ListConfig, ScopeConfig};
pub use record::Record;
pub use scope::ScopeResolver;
pub use value::FieldValue;

/// Name of the primary key column every listed table carries.
pub const ID_COLUMN: &str = "id";

pub mod ids {
    /// A validated SQL identifier (table or column name).
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Identifier(String);

    impl Identifier {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, IdentifierError> {
            let value = value.into();
            validate_identifier(&value)?;
            Ok(Self(value))
        }

        /// Double-quoted form, safe to splice into SQL text.
        pub fn quoted(&self) -> String {
            format!("\"{}\"", self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
    pub enum IdentifierError {
        #[error("identifier must not be empty")]
        Empty,
        #[error("identifier is too long")]
        TooLong,
        #[error("identifier must start with a letter or '_'")]
        InvalidFirstChar,
        #[error("identifier contains {ch:?} at index {index}")]
        InvalidChar { ch: char, index: usize },
    }

    pub(crate) fn is_identifier_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    pub(crate) fn is_identifier_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    fn validate_identifier(value: &str) -> Result<(), IdentifierError> {
        if value.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if value.len() > 64 {
            return Err(IdentifierError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(IdentifierError::Empty);
        };
        if !is_identifier_start(first) {
            return Err(IdentifierError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate().skip(1) {
            if !is_identifier_char(ch) {
                return Err(IdentifierError::InvalidChar { ch, index });
            }
        }
        Ok(())
    }

}
