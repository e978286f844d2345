// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use crate::api::{Registry, ServiceAccount};
use crate::config::RepositoryConfig;
use crate::formats::plugin::Request;
use crate::poller::Poller;

use std::io::Write;

use serde::Serialize;
use structopt::StructOpt;

mod configuration;
mod connection;
mod revision;
mod tags;
mod validate;

pub trait Command {
    fn execute(self) -> anyhow::Result<()>;
}

/// Every request the delivery server can send
///
/// Requests that carry a body read it as JSON from stdin; every response
/// body is written as JSON to stdout.
#[derive(StructOpt, Debug)]
#[structopt(about = "tracks container registry tags as package revisions")]
pub enum Main {
    RepositoryConfiguration(configuration::RepositoryConfiguration),
    PackageConfiguration(configuration::PackageConfiguration),
    ValidateRepositoryConfiguration(validate::ValidateRepository),
    ValidatePackageConfiguration(validate::ValidatePackage),
    CheckRepositoryConnection(connection::CheckRepository),
    CheckPackageConnection(connection::CheckPackage),
    LatestRevision(revision::LatestRevision),
    LatestRevisionSince(revision::LatestRevisionSince),
    Tags(tags::Tags),
}

impl Command for Main {
    fn execute(self) -> anyhow::Result<()> {
        match self {
            Self::RepositoryConfiguration(cmd) => cmd.execute(),
            Self::PackageConfiguration(cmd) => cmd.execute(),
            Self::ValidateRepositoryConfiguration(cmd) => cmd.execute(),
            Self::ValidatePackageConfiguration(cmd) => cmd.execute(),
            Self::CheckRepositoryConnection(cmd) => cmd.execute(),
            Self::CheckPackageConnection(cmd) => cmd.execute(),
            Self::LatestRevision(cmd) => cmd.execute(),
            Self::LatestRevisionSince(cmd) => cmd.execute(),
            Self::Tags(cmd) => cmd.execute(),
        }
    }
}

fn request() -> anyhow::Result<Request> {
    Ok(serde_json::from_reader(std::io::stdin().lock())?)
}

fn respond<T: Serialize + ?Sized>(body: &T) -> anyhow::Result<()> {
    write_body(std::io::stdout().lock(), body)
}

/// Writes one response body as a single line of JSON
fn write_body<W: Write, T: Serialize + ?Sized>(mut out: W, body: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut out, body)?;
    writeln!(out)?;
    Ok(())
}

/// Exchanges the configured key for a token and opens the registry
fn session(repo: &RepositoryConfig) -> crate::error::Result<(Poller<Registry>, String)> {
    let token = ServiceAccount::from_json(&repo.service_account)?.access_token()?;
    let registry = Registry::new(&repo.registry_url)?;
    Ok((Poller::new(registry, &repo.project), token))
}
