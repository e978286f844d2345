// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use crate::api::{Registry, RegistryAccess, ServiceAccount};
use crate::revision::{select_latest, FilterPattern, TagCatalog};

use super::Command;

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat};
use structopt::StructOpt;

/// List the matching tags of an image, newest upload first
#[derive(StructOpt, Debug)]
pub struct Tags {
    /// The registry host or base url
    #[structopt(long, default_value = "gcr.io")]
    registry: String,

    /// The project owning the image
    #[structopt(long)]
    project: String,

    /// A service account key file (JSON)
    #[structopt(long)]
    key: PathBuf,

    /// Only list tags matching this regular expression (an invalid one lists nothing)
    #[structopt(long, short)]
    filter: Option<String>,

    /// The image name
    image: String,
}

impl Command for Tags {
    fn execute(self) -> anyhow::Result<()> {
        let filter = FilterPattern::fail_closed(self.filter.as_deref());
        let account = ServiceAccount::from_json(&std::fs::read_to_string(&self.key)?)?;
        let registry = Registry::new(&self.registry)?;

        let bearer = account.access_token()?;
        let token = registry.image_token(&self.project, &self.image, &bearer)?;
        let list = registry.tags(&self.project, &self.image, &token.token)?;
        let catalog = TagCatalog::try_from(&list)?;

        let mut rows: Vec<_> = catalog
            .manifests()
            .map(|(_, m)| {
                let tags: Vec<_> = m.tags().iter().filter(|t| filter.matches(t)).collect();
                (m.uploaded_at_millis(), tags)
            })
            .filter(|(_, tags)| !tags.is_empty())
            .collect();
        rows.sort_by(|a, b| b.0.cmp(&a.0));

        let latest = select_latest(&catalog, &filter);
        for (millis, tags) in rows {
            let when = DateTime::from_timestamp_millis(millis)
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_else(|| millis.to_string());

            for tag in tags {
                let mark = match &latest {
                    Some(l) if l.tag == *tag && l.uploaded_at_millis == millis => "*",
                    _ => " ",
                };

                println!("{} {}\t{}", mark, tag, when);
            }
        }

        Ok(())
    }
}
