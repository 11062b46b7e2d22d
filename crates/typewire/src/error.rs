// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for descriptors, builders and the binary codec.
//!
//! Every error names the schema type it concerns and, where one applies, the
//! field(s) at fault. Unknown fields and wire-type mismatches met while
//! decoding are *not* errors: the reader skips them.

use crate::descriptor::FieldId;
use std::io;
use thiserror::Error;

/// Schema construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("Duplicate field id {id} in {message}")]
    DuplicateFieldId { message: String, id: FieldId },

    #[error("Duplicate field name '{field}' in {message}")]
    DuplicateFieldName { message: String, field: String },

    #[error("Union {message} cannot declare required field '{field}'")]
    RequiredUnionField { message: String, field: String },

    #[error("Duplicate value {value} in enum {name}")]
    DuplicateEnumValue { name: String, value: i32 },

    #[error("Duplicate name '{entry}' in enum {name}")]
    DuplicateEnumName { name: String, entry: String },

    #[error("Type {0} is already registered")]
    DuplicateType(String),

    #[error("Unresolved type reference: {0}")]
    UnresolvedType(String),
}

/// Builder access errors.
///
/// These are programming errors on the caller's side (wrong id, wrong value
/// type), raised at the call that made them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("No such field id {id} in {message}")]
    NoSuchField { message: String, id: FieldId },

    #[error("Field '{field}' in {message} is not a message field")]
    NotAMessage { message: String, field: String },

    #[error("Field '{field}' in {message} is not a {expected}")]
    WrongContainer {
        message: String,
        field: String,
        expected: &'static str,
    },

    #[error("Type mismatch for {message}.{field}: expected {expected}, got {got}")]
    TypeMismatch {
        message: String,
        field: String,
        expected: String,
        got: String,
    },

    #[error("Cannot merge {got} into a builder of {expected}")]
    DescriptorMismatch { expected: String, got: String },
}

/// Raised by `validate()` / `build()` when the builder cannot produce a
/// complete message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields {} in message {message}", .fields.join(","))]
    MissingRequired { message: String, fields: Vec<String> },

    #[error("No union field set in {message}")]
    NoUnionField { message: String },
}

impl ValidationError {
    /// Qualified name of the message type that failed validation.
    pub fn message_type(&self) -> &str {
        match self {
            Self::MissingRequired { message, .. } | Self::NoUnionField { message } => message,
        }
    }

    /// Names of the missing required fields (empty for unions).
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::MissingRequired { fields, .. } => fields,
            Self::NoUnionField { .. } => &[],
        }
    }
}

/// Binary encoding errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Length {len} does not fit the 32-bit length prefix")]
    LengthOverflow { len: usize },

    #[error("Value of type {got} cannot be written as {expected}")]
    InvalidValue { expected: String, got: String },
}

/// Binary decoding errors (malformed input).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unexpected end of input while reading {context}")]
    Truncated { context: &'static str },

    #[error("I/O error: {0}")]
    Io(io::Error),

    #[error("Invalid wire type {tag:#04x} while reading {context}")]
    InvalidWireType { tag: u8, context: &'static str },

    #[error("Invalid UTF-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Nesting depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error("Declared length {len} exceeds limit of {limit}")]
    LengthExceeded { len: u32, limit: u32 },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DecodeError {
    /// Map a source error, naming what was being read when it failed.
    pub(crate) fn io(err: io::Error, context: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated { context }
        } else {
            Self::Io(err)
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        Self::io(err, "input")
    }
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_lists_every_field() {
        let err = ValidationError::MissingRequired {
            message: "calc.Operation".into(),
            fields: vec!["operator".into(), "operands".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields operator,operands in message calc.Operation"
        );
        assert_eq!(err.message_type(), "calc.Operation");
        assert_eq!(err.missing_fields().len(), 2);
    }

    #[test]
    fn test_unexpected_eof_maps_to_truncated() {
        let err = DecodeError::io(io::Error::from(io::ErrorKind::UnexpectedEof), "field header");
        match err {
            DecodeError::Truncated { context } => assert_eq!(context, "field header"),
            other => panic!("unexpected error {other:?}"),
        }

        let err: DecodeError = io::Error::from(io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, DecodeError::Io(_)));
    }

    #[test]
    fn test_validation_error_converts_into_decode_and_crate_error() {
        let err: DecodeError = ValidationError::NoUnionField {
            message: "test.Choice".into(),
        }
        .into();
        assert_eq!(err.to_string(), "No union field set in test.Choice");

        let err: Error = err.into();
        assert!(matches!(err, Error::Decode(DecodeError::Validation(_))));
    }
}
