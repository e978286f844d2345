// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

//! Selection of the latest image tag and change detection

mod catalog;
mod filter;
mod resolver;

pub use catalog::TagCatalog;
pub use filter::FilterPattern;
pub use resolver::{resolve_change, select_latest, Resolution};

/// A tag together with the upload time of the manifest carrying it
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Revision {
    pub tag: String,
    pub uploaded_at_millis: i64,
}

impl Revision {
    pub fn new(tag: &str, uploaded_at_millis: i64) -> Self {
        Self {
            tag: tag.into(),
            uploaded_at_millis,
        }
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.tag, self.uploaded_at_millis)
    }
}
