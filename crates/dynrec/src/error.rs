// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for shape and record operations.

use std::fmt;

/// Errors returned by shape registry and record operations.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Definition Errors
    // ========================================================================
    /// Shape request is malformed (empty label, empty or duplicate field
    /// name, empty or duplicate operation name).
    InvalidArgument(String),

    // ========================================================================
    // Field Access Errors
    // ========================================================================
    /// Named field is not declared on the record's shape.
    FieldNotFound(String),
    /// Value kind does not match the declared kind.
    TypeMismatch {
        /// Declared kind name.
        expected: String,
        /// Kind name of the rejected value.
        got: String,
    },

    // ========================================================================
    // Invocation Errors
    // ========================================================================
    /// Named operation is not declared on the record's shape.
    OperationNotFound(String),
    /// Operation invoked with the wrong number of arguments.
    ArityMismatch {
        /// Operation name.
        operation: String,
        /// Declared parameter count.
        expected: usize,
        /// Argument count supplied by the caller.
        got: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::FieldNotFound(name) => write!(f, "Field not found: {}", name),
            Error::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, got)
            }
            Error::OperationNotFound(name) => write!(f, "Operation not found: {}", name),
            Error::ArityMismatch {
                operation,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Operation '{}' takes {} argument(s), got {}",
                    operation, expected, got
                )
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;
