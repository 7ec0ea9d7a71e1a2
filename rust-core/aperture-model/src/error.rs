// SPDX-License-Identifier: PMPL-1.0-or-later
//! Model error types.
//!
//! Every value in the model is a closed enum, so the only fallible path is
//! turning text (CLI arguments, config files, wire strings) back into those
//! enums.

use thiserror::Error;

/// Errors that can occur while parsing model values from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown page: {0}")]
    UnknownPage(String),

    /// The input did not have the `<resource>::<action>` shape.
    #[error("malformed permission '{0}': expected '<resource>::<action>'")]
    MalformedPermission(String),
}

/// Convenience type alias for model results.
pub type ModelResult<T> = Result<T, ModelError>;
