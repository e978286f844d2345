// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use crate::api::RegistryAccess;
use crate::config::PackageConfig;
use crate::error::Result;
use crate::formats::plugin::CheckConnection;
use crate::revision::{resolve_change, Resolution, Revision, TagCatalog};

use log::{debug, error, info};

/// Polls one registry project on behalf of the delivery server
///
/// Nothing is remembered between calls: the caller passes the revision it
/// already knows every time it asks for changes.
pub struct Poller<R> {
    registry: R,
    project: String,
}

impl<R: RegistryAccess> Poller<R> {
    pub fn new(registry: R, project: &str) -> Self {
        Self {
            registry,
            project: project.into(),
        }
    }

    pub fn check_repository_connection(&self, bearer: &str) -> CheckConnection {
        match self.registry.catalog_token(bearer) {
            Ok(..) => CheckConnection::success("Successfully connected to repository"),
            Err(e) => {
                error!("error checking connection to repository: {}", e);
                CheckConnection::failure(e.to_string())
            }
        }
    }

    pub fn check_package_connection(&self, package: &PackageConfig, bearer: &str) -> CheckConnection {
        match self.tag_list(package, bearer) {
            Ok(..) => CheckConnection::success("Successfully connected to package"),
            Err(e) => {
                error!("error checking connection to package {}: {}", package.image, e);
                CheckConnection::failure(e.to_string())
            }
        }
    }

    /// Reports the latest matching tag unconditionally
    pub fn latest_revision(&self, package: &PackageConfig, bearer: &str) -> Result<Resolution> {
        self.poll(package, None, bearer)
    }

    /// Reports the latest matching tag only if it differs from `previous`
    pub fn latest_revision_since(
        &self,
        package: &PackageConfig,
        previous: &Revision,
        bearer: &str,
    ) -> Result<Resolution> {
        self.poll(package, Some(previous), bearer)
    }

    /// Fetches the tag listing with an image-scoped token
    fn tag_list(&self, package: &PackageConfig, bearer: &str) -> Result<TagCatalog> {
        let token = self
            .registry
            .image_token(&self.project, &package.image, bearer)?;
        let list = self
            .registry
            .tags(&self.project, &package.image, &token.token)?;

        TagCatalog::try_from(&list)
    }

    fn poll(
        &self,
        package: &PackageConfig,
        previous: Option<&Revision>,
        bearer: &str,
    ) -> Result<Resolution> {
        let result = package.filter().and_then(|filter| {
            let catalog = self.tag_list(package, bearer)?;
            debug!("{} manifests listed for {}", catalog.len(), package.image);
            Ok(resolve_change(&catalog, &filter, previous))
        });

        match &result {
            Ok(Resolution::NewRevision(rev)) => info!("new revision of {}: {}", package.image, rev),
            Ok(Resolution::Unchanged) => debug!("{} is unchanged", package.image),
            Ok(Resolution::NoRevision) => debug!("no tag of {} matches", package.image),
            Err(e) => error!("error polling {}: {}", package.image, e),
        }

        result
    }
}
