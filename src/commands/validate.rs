// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use super::Command;
use crate::config;

use log::info;
use structopt::StructOpt;

/// Validate the repository settings read from stdin
#[derive(StructOpt, Debug)]
pub struct ValidateRepository {}

impl Command for ValidateRepository {
    fn execute(self) -> anyhow::Result<()> {
        let req = super::request()?;
        let errors = config::validate_repository(&req.repository_configuration);
        if !errors.is_empty() {
            info!("repository configuration has {} problem(s)", errors.len());
        }

        super::respond(&errors)
    }
}

/// Validate the package settings read from stdin
#[derive(StructOpt, Debug)]
pub struct ValidatePackage {}

impl Command for ValidatePackage {
    fn execute(self) -> anyhow::Result<()> {
        let req = super::request()?;
        let errors = config::validate_package(&req.package_configuration);
        if !errors.is_empty() {
            info!("package configuration has {} problem(s)", errors.len());
        }

        super::respond(&errors)
    }
}
