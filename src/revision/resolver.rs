// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use super::{FilterPattern, Revision, TagCatalog};

/// What a poll should report to the caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// No manifest carries a matching tag
    NoRevision,

    /// The latest matching tag is the one the caller already knows
    Unchanged,

    NewRevision(Revision),
}

/// Selects the matching tag with the greatest upload time
///
/// Each manifest contributes only its first matching tag. A candidate must
/// be strictly newer than the current best, starting from a floor of zero,
/// so an upload time of exactly zero never wins and ties keep the manifest
/// that comes first in the catalog.
pub fn select_latest(catalog: &TagCatalog, filter: &FilterPattern) -> Option<Revision> {
    let mut latest: Option<Revision> = None;
    let mut floor = 0;

    for (_, manifest) in catalog.manifests() {
        let tag = match manifest.tags().iter().find(|t| filter.matches(t)) {
            Some(tag) => tag,
            None => continue,
        };

        if manifest.uploaded_at_millis() > floor {
            floor = manifest.uploaded_at_millis();
            latest = Some(Revision::new(tag, floor));
        }
    }

    latest
}

/// Compares the latest matching tag against what the caller already has
///
/// Identity is the `(tag, upload time)` pair: a tag name that moved to a
/// newer manifest is a new revision.
pub fn resolve_change(
    catalog: &TagCatalog,
    filter: &FilterPattern,
    previous: Option<&Revision>,
) -> Resolution {
    match (select_latest(catalog, filter), previous) {
        (None, _) => Resolution::NoRevision,
        (Some(latest), Some(previous)) if latest == *previous => Resolution::Unchanged,
        (Some(latest), _) => Resolution::NewRevision(latest),
    }
}

#[cfg(test)]
mod tests {
    use super::super::catalog::{digest, Manifest};
    use super::*;

    fn catalog(manifests: &[(&[&str], i64)]) -> TagCatalog {
        let mut catalog = TagCatalog::default();
        for (n, (tags, t)) in manifests.iter().enumerate() {
            catalog.insert(digest(n as u8 + 1), Manifest::new(tags.iter().copied(), *t));
        }
        catalog
    }

    fn filter(raw: &str) -> FilterPattern {
        FilterPattern::compile(Some(raw)).unwrap()
    }

    fn scenario() -> TagCatalog {
        catalog(&[(&["1.1.0"], 2), (&["1.1.1"], 3), (&["2.1.0"], 4)])
    }

    #[test]
    fn no_matching_tag() {
        let catalog = catalog(&[(&["latest"], 5), (&[], 9)]);
        let filter = filter("^v");
        let previous = Revision::new("v1", 1);

        assert_eq!(select_latest(&catalog, &filter), None);
        assert_eq!(resolve_change(&catalog, &filter, None), Resolution::NoRevision);
        assert_eq!(
            resolve_change(&catalog, &filter, Some(&previous)),
            Resolution::NoRevision
        );
    }

    #[test]
    fn single_match() {
        let catalog = catalog(&[(&["v1"], 42)]);
        assert_eq!(
            select_latest(&catalog, &FilterPattern::match_all()),
            Some(Revision::new("v1", 42))
        );
    }

    #[test]
    fn newer_upload_wins_over_tag_order() {
        let catalog = catalog(&[(&["b"], 20), (&["a"], 10)]);
        assert_eq!(
            select_latest(&catalog, &filter(".*")),
            Some(Revision::new("b", 20))
        );

        let catalog = self::catalog(&[(&["a"], 10), (&["b"], 20)]);
        assert_eq!(
            select_latest(&catalog, &filter(".*")),
            Some(Revision::new("b", 20))
        );
    }

    #[test]
    fn filter_restricts_candidates() {
        let catalog = catalog(&[(&["1.0.0"], 1), (&["latest"], 3), (&["2.0.0-rc"], 2)]);

        let semver = filter(r"^[0-9]+\.[0-9]+\.[0-9]+$");
        assert_eq!(select_latest(&catalog, &semver), Some(Revision::new("1.0.0", 1)));

        let release = filter(r"^[0-9]+\.[0-9]+\.[0-9]+");
        assert_eq!(
            select_latest(&catalog, &release),
            Some(Revision::new("2.0.0-rc", 2))
        );
    }

    #[test]
    fn first_matching_tag_represents_manifest() {
        let catalog = catalog(&[(&["latest", "1.2.0", "1.2"], 7)]);
        assert_eq!(
            select_latest(&catalog, &filter(r"^\d")),
            Some(Revision::new("1.2.0", 7))
        );
    }

    #[test]
    fn zero_upload_time_never_wins() {
        let catalog = catalog(&[(&["epoch"], 0)]);
        assert_eq!(select_latest(&catalog, &FilterPattern::match_all()), None);
    }

    #[test]
    fn ties_keep_first_in_catalog_order() {
        let catalog = catalog(&[(&["x"], 5), (&["y"], 5)]);
        assert_eq!(
            select_latest(&catalog, &FilterPattern::match_all()),
            Some(Revision::new("x", 5))
        );
    }

    #[test]
    fn selection_is_idempotent() {
        let catalog = scenario();
        let filter = filter(".*");
        assert_eq!(select_latest(&catalog, &filter), select_latest(&catalog, &filter));
    }

    #[test]
    fn blank_filter_matches_like_match_all() {
        let catalog = catalog(&[(&["latest"], 1), (&["1.0"], 2)]);
        let all = FilterPattern::match_all();

        for raw in [None, Some("")] {
            let blank = FilterPattern::compile(raw).unwrap();
            assert_eq!(select_latest(&catalog, &blank), select_latest(&catalog, &all));
        }
    }

    #[test]
    fn scenario_latest() {
        let catalog = scenario();
        assert_eq!(
            select_latest(&catalog, &filter(".*")),
            Some(Revision::new("2.1.0", 4))
        );
        assert_eq!(
            select_latest(&catalog, &filter("^1.*")),
            Some(Revision::new("1.1.1", 3))
        );
    }

    #[test]
    fn scenario_unchanged() {
        let previous = Revision::new("2.1.0", 4);
        assert_eq!(
            resolve_change(&scenario(), &filter(".*"), Some(&previous)),
            Resolution::Unchanged
        );
    }

    #[test]
    fn change_detection_uses_tag_and_time() {
        let previous = Revision::new("1.0.0", 5);

        let same = catalog(&[(&["1.0.0"], 5)]);
        assert_eq!(
            resolve_change(&same, &FilterPattern::match_all(), Some(&previous)),
            Resolution::Unchanged
        );

        let retagged = catalog(&[(&["1.0.0"], 8)]);
        assert_eq!(
            resolve_change(&retagged, &FilterPattern::match_all(), Some(&previous)),
            Resolution::NewRevision(Revision::new("1.0.0", 8))
        );
    }

    #[test]
    fn no_previous_reports_latest() {
        assert_eq!(
            resolve_change(&scenario(), &FilterPattern::match_all(), None),
            Resolution::NewRevision(Revision::new("2.1.0", 4))
        );
    }

    #[test]
    fn invalid_filter_fails_closed() {
        let filter = FilterPattern::fail_closed(Some("(("));
        assert_eq!(resolve_change(&scenario(), &filter, None), Resolution::NoRevision);
    }
}
