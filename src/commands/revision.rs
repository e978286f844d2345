// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use super::Command;
use crate::api::RegistryAccess;
use crate::config::{PackageConfig, RepositoryConfig};
use crate::error;
use crate::formats::plugin::{PackageRevision, Request};
use crate::poller::Poller;
use crate::revision::{Resolution, Revision};

use std::io::Write;

use anyhow::{Context, Result};
use structopt::StructOpt;

/// Report the latest matching tag of the configured image
#[derive(StructOpt, Debug)]
pub struct LatestRevision {}

impl Command for LatestRevision {
    fn execute(self) -> Result<()> {
        let req = super::request()?;
        report(std::io::stdout().lock(), poll(&req, None))
    }
}

/// Report the latest matching tag if it differs from `previous-revision`
#[derive(StructOpt, Debug)]
pub struct LatestRevisionSince {}

impl Command for LatestRevisionSince {
    fn execute(self) -> Result<()> {
        let req = super::request()?;
        report(std::io::stdout().lock(), poll(&req, previous(&req).as_ref()))
    }
}

/// The revision the server already holds; without one the latest tag is new
fn previous(req: &Request) -> Option<Revision> {
    req.previous_revision.as_ref().map(PackageRevision::to_revision)
}

fn poll(req: &Request, previous: Option<&Revision>) -> error::Result<Resolution> {
    let repo = RepositoryConfig::from_properties(&req.repository_configuration)?;
    let pkg = PackageConfig::from_properties(&req.package_configuration)?;
    let (poller, token) = super::session(&repo)?;

    resolve(&poller, &pkg, previous, &token)
}

fn resolve<R: RegistryAccess>(
    poller: &Poller<R>,
    pkg: &PackageConfig,
    previous: Option<&Revision>,
    token: &str,
) -> error::Result<Resolution> {
    match previous {
        Some(previous) => poller.latest_revision_since(pkg, previous, token),
        None => poller.latest_revision(pkg, token),
    }
}

/// Writes the revision, or an empty body when there is nothing new
///
/// A failed poll also writes an empty body, but then exits with an error so
/// that it cannot be taken for an unchanged image.
fn report<W: Write>(out: W, result: error::Result<Resolution>) -> Result<()> {
    let body = result.and_then(|resolution| match resolution {
        Resolution::NewRevision(rev) => PackageRevision::from_revision(&rev).map(Some),
        Resolution::Unchanged | Resolution::NoRevision => Ok(None),
    });

    match body {
        Ok(Some(rev)) => super::write_body(out, &rev),
        Ok(None) => super::write_body(out, &serde_json::json!({})),
        Err(e) => {
            super::write_body(out, &serde_json::json!({}))?;
            Err(e).context("unable to poll for a new revision")
        }
    }
}
