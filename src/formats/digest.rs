// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use serde::Deserialize;

/// A content digest naming a manifest
///
/// Registries report digests in the form 'ALGORITHM:HEX_BYTES', but the
/// value only identifies and orders manifests, so it is kept verbatim and
/// never validated.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl From<String> for Digest {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Digest {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    #[test]
    fn keeps_keys_verbatim() {
        let json = r#"{"sha256:abc": 1, "SHA256:ABC": 2, "sha256:ABC": 3, "not a digest": 4}"#;
        let map: BTreeMap<Digest, u32> = serde_json::from_str(json).unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map[&Digest::from("sha256:ABC")], 3);
        assert_eq!(Digest::from("not a digest").to_string(), "not a digest");
    }

    #[test]
    fn orders_by_text() {
        let mut digests = vec![
            Digest::from("sha256:2"),
            Digest::from("sha256:10"),
            Digest::from("md5:ff"),
        ];
        digests.sort();

        let names: Vec<_> = digests.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["md5:ff", "sha256:10", "sha256:2"]);
    }
}
