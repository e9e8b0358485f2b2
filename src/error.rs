// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Error handling. */

use thiserror::Error;

/// Primary crate error type.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// A package description failed validation.
    #[error("{0}")]
    Validation(String),

    #[error("no packager registered for the format {0}")]
    UnknownFormat(String),

    /// A source pattern matched no files on the builder host.
    #[error("glob failed: {0}: file does not exist")]
    GlobFailure(String),

    #[error("glob failed: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The signer rejected its input or a crypto primitive failed.
    #[error("signing failure: {0}")]
    Signing(String),

    /// Invalid combination of options for a specific producer.
    #[error("{0}")]
    Format(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl PackagingError {
    /// Whether this error came from the signing facade.
    pub fn is_signing_failure(&self) -> bool {
        matches!(self, Self::Signing(_))
    }
}

/// Result wrapper for this crate.
pub type Result<T> = std::result::Result<T, PackagingError>;
