//! Error types with diagnostics using miette
//!
//! `HostError` is what a host collaborator reports; `LayoutError` is what an
//! operation reports. Commands fold both into an [`Outcome`](crate::Outcome).

use miette::Diagnostic;
use thiserror::Error;

use crate::host::ElementId;
use crate::types::NumericError;

// ============================================================================
// Host Errors
// ============================================================================

/// Errors raised by a [`Host`](crate::host::Host) implementation
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("operation cancelled by user")]
    #[diagnostic(code(tagalign::host::cancelled))]
    Cancelled,

    #[error("unknown element: {id}")]
    #[diagnostic(code(tagalign::host::unknown_element))]
    UnknownElement { id: ElementId },

    #[error("element {id} has no leader")]
    #[diagnostic(code(tagalign::host::no_leader))]
    NoLeader { id: ElementId },

    #[error("element {id} does not support {operation}")]
    #[diagnostic(code(tagalign::host::unsupported))]
    Unsupported {
        id: ElementId,
        operation: &'static str,
    },

    #[error("no open mutation scope")]
    #[diagnostic(
        code(tagalign::host::no_scope),
        help("start a scope with `begin_scope` before mutating the host")
    )]
    NoScope,

    #[error("{message}")]
    #[diagnostic(code(tagalign::host::failure))]
    Failure { message: String },
}

impl HostError {
    pub fn failure(message: impl Into<String>) -> Self {
        HostError::Failure { message: message.into() }
    }
}

// ============================================================================
// Layout Errors
// ============================================================================

/// Errors that abort a layout operation
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("cancelled")]
    #[diagnostic(code(tagalign::cancelled))]
    Cancelled,

    #[error("{message}")]
    #[diagnostic(code(tagalign::validation))]
    Validation { message: String },

    #[error("invalid setting `{name}`: {source}")]
    #[diagnostic(
        code(tagalign::invalid_setting),
        help("layout settings must be finite and non-negative")
    )]
    InvalidSetting {
        name: &'static str,
        #[source]
        source: NumericError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Host(HostError),
}

impl LayoutError {
    pub fn validation(message: impl Into<String>) -> Self {
        LayoutError::Validation { message: message.into() }
    }
}

/// A user abort surfacing from the host is a cancellation, not a failure.
impl From<HostError> for LayoutError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Cancelled => LayoutError::Cancelled,
            other => LayoutError::Host(other),
        }
    }
}
