// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use super::Command;
use crate::config;

use structopt::StructOpt;

/// Print the settings a repository needs
#[derive(StructOpt, Debug)]
pub struct RepositoryConfiguration {}

impl Command for RepositoryConfiguration {
    fn execute(self) -> anyhow::Result<()> {
        super::respond(&config::repository_schema())
    }
}

/// Print the settings a package needs
#[derive(StructOpt, Debug)]
pub struct PackageConfiguration {}

impl Command for PackageConfiguration {
    fn execute(self) -> anyhow::Result<()> {
        super::respond(&config::package_schema())
    }
}
