// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Aperture authorization - Error types
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Query operations never fail: a refused request is just `false`. These
// types cover the places where a caller asked for something to *happen*
// (a guard, a session transition, a role assignment, loading configuration)
// and needs to know why it did not.

use aperture_model::{Permission, Role};
use thiserror::Error;

/// Invalid session state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `login` was called while an actor is already bound.
    #[error("session already bound to actor '{actor}'")]
    AlreadyBound {
        /// The actor currently holding the session.
        actor: String,
    },

    /// A role update or logout was attempted with no actor bound.
    #[error("no actor bound to session")]
    NotBound,
}

/// Reasons a guarded operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// No actor is bound; every guarded operation is refused.
    #[error("not signed in")]
    Unauthenticated,

    #[error("role '{role}' lacks permission '{permission}'")]
    MissingPermission {
        role: Role,
        permission: Permission,
    },

    #[error("role '{role}' may not open page '{page}' (requires '{permission}')")]
    PageDenied {
        role: Role,
        page: String,
        permission: Permission,
    },

    /// The acting role may not edit a user holding `target`.
    #[error("role '{acting}' may not edit users with role '{target}'")]
    CannotEditUser { acting: Role, target: Role },

    /// The acting role may not hand out `role`.
    #[error("role '{acting}' may not assign role '{role}'")]
    CannotAssignRole { acting: Role, role: Role },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An override (environment variable) carried a value that does not parse.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Convenience type alias for guarded operations.
pub type AuthzResult<T> = Result<T, AuthzError>;
