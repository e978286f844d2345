// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use crate::error::{Error, Result};
use crate::formats::gcr::{ManifestEntry, Millis, TagList};
use crate::formats::Digest;

use std::collections::BTreeMap;

use chrono::DateTime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    tags: Vec<String>,
    uploaded_at_millis: i64,
}

impl Manifest {
    pub fn new<T: Into<String>>(tags: impl IntoIterator<Item = T>, uploaded_at_millis: i64) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            uploaded_at_millis,
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn uploaded_at_millis(&self) -> i64 {
        self.uploaded_at_millis
    }

    fn from_entry(digest: &Digest, entry: &ManifestEntry) -> Result<Self> {
        let invalid = |reason: String| Error::Manifest {
            digest: digest.to_string(),
            reason,
        };

        let millis = match &entry.time_uploaded_ms {
            None => return Err(invalid("missing timeUploadedMs".into())),
            Some(Millis::Number(n)) => *n,
            Some(Millis::Text(s)) => s
                .trim()
                .parse()
                .map_err(|e| invalid(format!("{:?}: {}", s, e)))?,
            Some(Millis::Other(v)) => return Err(invalid(format!("{} is not an integer", v))),
        };

        if millis < 0 {
            return Err(invalid(format!("{} is before the epoch", millis)));
        }

        if DateTime::from_timestamp_millis(millis).is_none() {
            return Err(invalid(format!("{} is out of range", millis)));
        }

        Ok(Self::new(entry.tag.iter().cloned(), millis))
    }
}

/// All manifests currently known for one image
///
/// Manifests are kept in digest order, so every walk over the catalog
/// visits them in the same sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagCatalog(BTreeMap<Digest, Manifest>);

impl TagCatalog {
    pub fn insert(&mut self, digest: Digest, manifest: Manifest) {
        self.0.insert(digest, manifest);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn manifests(&self) -> impl Iterator<Item = (&Digest, &Manifest)> {
        self.0.iter()
    }
}

impl TryFrom<&TagList> for TagCatalog {
    type Error = Error;

    /// Fails on the first manifest without a usable upload time
    fn try_from(list: &TagList) -> Result<Self> {
        let mut catalog = Self::default();
        for (digest, entry) in &list.manifest {
            catalog.insert(digest.clone(), Manifest::from_entry(digest, entry)?);
        }

        Ok(catalog)
    }
}

#[cfg(test)]
pub(crate) fn digest(n: u8) -> Digest {
    Digest::from(format!("sha256:{:064x}", n))
}
