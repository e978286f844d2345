// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use super::Command;
use crate::config::{PackageConfig, RepositoryConfig};
use crate::formats::plugin::{CheckConnection, Request};

use log::error;
use structopt::StructOpt;

/// Check that the registry accepts the configured credentials
#[derive(StructOpt, Debug)]
pub struct CheckRepository {}

impl Command for CheckRepository {
    fn execute(self) -> anyhow::Result<()> {
        let req = super::request()?;
        super::respond(&check_repository(&req))
    }
}

/// Check that the configured image can be listed
#[derive(StructOpt, Debug)]
pub struct CheckPackage {}

impl Command for CheckPackage {
    fn execute(self) -> anyhow::Result<()> {
        let req = super::request()?;
        super::respond(&check_package(&req))
    }
}

fn check_repository(req: &Request) -> CheckConnection {
    let result = RepositoryConfig::from_properties(&req.repository_configuration)
        .and_then(|repo| super::session(&repo))
        .map(|(poller, token)| poller.check_repository_connection(&token));

    unwrap_check(result)
}

fn check_package(req: &Request) -> CheckConnection {
    let result = PackageConfig::from_properties(&req.package_configuration).and_then(|pkg| {
        let repo = RepositoryConfig::from_properties(&req.repository_configuration)?;
        let (poller, token) = super::session(&repo)?;
        Ok(poller.check_package_connection(&pkg, &token))
    });

    unwrap_check(result)
}

/// Settings and credential problems are reported as a failed check
fn unwrap_check(result: crate::error::Result<CheckConnection>) -> CheckConnection {
    result.unwrap_or_else(|e| {
        error!("unable to check connection: {}", e);
        CheckConnection::failure(e.to_string())
    })
}
