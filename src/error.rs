// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A user-supplied setting is missing or malformed
    #[error("{key}: {message}")]
    Configuration { key: String, message: String },

    /// The credential could not be parsed or exchanged for a token
    #[error("{0}")]
    Credential(String),

    /// The registry was unreachable or answered with a failure status
    #[error("{0}")]
    Transport(String),

    #[error("invalid tag filter {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A manifest in a tag listing has no usable upload time
    #[error("manifest {digest} has an invalid upload time: {reason}")]
    Manifest { digest: String, reason: String },
}

impl Error {
    pub fn configuration(key: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            message: message.into(),
        }
    }
}
