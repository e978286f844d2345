// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use crate::error::{Error, Result};

use log::warn;
use regex::Regex;

const MATCH_ALL: &str = ".*";

/// A compiled tag filter
///
/// A tag is eligible when the expression matches anywhere inside it, so
/// patterns that must cover the whole tag need explicit `^` and `$` anchors.
#[derive(Clone, Debug)]
pub struct FilterPattern(Option<Regex>);

impl FilterPattern {
    /// Compiles a user-supplied filter; absent or blank input matches every tag
    pub fn compile(raw: Option<&str>) -> Result<Self> {
        let pattern = match raw.filter(|r| !r.trim().is_empty()) {
            None => return Ok(Self::match_all()),
            Some(pattern) => pattern,
        };

        Regex::new(pattern)
            .map(|re| Self(Some(re)))
            .map_err(|source| Error::Pattern {
                pattern: pattern.into(),
                source,
            })
    }

    /// Like `compile`, but an invalid pattern yields a filter that matches nothing
    pub fn fail_closed(raw: Option<&str>) -> Self {
        Self::compile(raw).unwrap_or_else(|e| {
            warn!("{}; no tag will match", e);
            Self(None)
        })
    }

    pub fn match_all() -> Self {
        Self(Regex::new(MATCH_ALL).ok())
    }

    pub fn matches(&self, tag: &str) -> bool {
        match &self.0 {
            Some(re) => re.is_match(tag),
            None => false,
        }
    }
}
