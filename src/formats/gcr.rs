// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::Digest;

/// A millisecond timestamp, reported either as a JSON string or a number
///
/// Anything else is kept so that the catalog can reject it by digest.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Millis {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Clone, Debug, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub tag: Vec<String>,

    #[serde(rename = "timeUploadedMs")]
    pub time_uploaded_ms: Option<Millis>,
}

/// The response to `GET /v2/<project>/<image>/tags/list`
#[derive(Clone, Debug, Deserialize)]
pub struct TagList {
    #[serde(default)]
    pub manifest: BTreeMap<Digest, ManifestEntry>,
}

/// The response to `GET /v2/token`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Token {
    pub token: String,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tag_list() {
        let list: TagList = serde_json::from_str(fixtures::TAG_LIST).unwrap();
        assert_eq!(list.manifest.len(), 4);

        let uploads: Vec<_> = list
            .manifest
            .values()
            .map(|m| m.time_uploaded_ms.clone())
            .collect();
        assert_eq!(uploads[0], Some(Millis::Text("2".into())));
        assert_eq!(uploads[2], Some(Millis::Number(4)));
        assert!(list.manifest.values().last().unwrap().tag.is_empty());
    }

    #[test]
    fn keeps_unexpected_upload_times() {
        let json = r#"{"manifest": {
            "sha256:abc": {"tag": ["a"], "timeUploadedMs": 5.5},
            "sha256:def": {"tag": ["b"], "timeUploadedMs": 100000000000000000000}
        }}"#;
        let list: TagList = serde_json::from_str(json).unwrap();

        for entry in list.manifest.values() {
            assert!(matches!(entry.time_uploaded_ms, Some(Millis::Other(..))));
        }
    }

    #[test]
    fn decodes_token() {
        let token: Token =
            serde_json::from_str(r#"{"token": "secret", "expires_in": 3600}"#).unwrap();
        assert_eq!(token.token, "secret");
    }
}
