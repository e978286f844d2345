// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

//! Request and response bodies exchanged with the delivery server

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::revision::Revision;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Property {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_identity: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

impl Property {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

/// A keyed set of configuration properties
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, Property>);

impl Properties {
    pub fn insert(&mut self, key: &str, property: Property) {
        self.0.insert(key.into(), property);
    }

    pub fn with(mut self, key: &str, property: Property) -> Self {
        self.insert(key, property);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.0.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|p| p.value.as_deref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// The body of every request that carries configuration
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Request {
    #[serde(default)]
    pub repository_configuration: Properties,

    #[serde(default)]
    pub package_configuration: Properties,

    #[serde(default)]
    pub previous_revision: Option<PackageRevision>,
}

mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| D::Error::custom(format!("invalid timestamp {:?}: {}", text, e)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRevision {
    pub revision: String,

    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trackback_url: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl PackageRevision {
    pub fn from_revision(revision: &Revision) -> Result<Self> {
        let timestamp = DateTime::from_timestamp_millis(revision.uploaded_at_millis)
            .ok_or_else(|| Error::Manifest {
                digest: format!("tagged {}", revision.tag),
                reason: format!("{} is out of range", revision.uploaded_at_millis),
            })?;

        Ok(Self {
            revision: revision.tag.clone(),
            timestamp,
            user: None,
            revision_comment: None,
            trackback_url: None,
            data: BTreeMap::new(),
        })
    }

    pub fn to_revision(&self) -> Revision {
        Revision::new(&self.revision, self.timestamp.timestamp_millis())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckConnection {
    pub status: Status,
    pub messages: Vec<String>,
}

impl CheckConnection {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            messages: vec![message.into()],
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failure,
            messages: vec![message.into()],
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}
