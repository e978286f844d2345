// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

use crate::config::REGISTRY_URL;
use crate::error::{Error, Result};
use crate::formats::gcr::{TagList, Token};

use std::fmt::Display;

use log::{debug, error};
use reqwest::blocking::{Client, Response};

/// What the poller needs from a container registry
///
/// Every call authenticates with an opaque bearer token.
pub trait RegistryAccess {
    /// Obtains a token scoped to the registry catalog
    fn catalog_token(&self, bearer: &str) -> Result<Token>;

    /// Obtains a token allowed to pull `project/image`
    fn image_token(&self, project: &str, image: &str, bearer: &str) -> Result<Token>;

    fn tags(&self, project: &str, image: &str, bearer: &str) -> Result<TagList>;
}

#[derive(Clone, Debug)]
pub struct Registry {
    client: Client,
    base: String,
    host: String,
}

impl Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.host)
    }
}

impl Registry {
    const DEFAULT_SCHEME: &'static str = "https";

    /// Accepts either a bare host (`gcr.io`) or a base url (`http://host:port`)
    pub fn new(url: &str) -> Result<Self> {
        let url = url.trim();
        let (scheme, host) = url
            .split_once("://")
            .unwrap_or((Self::DEFAULT_SCHEME, url));

        let host = host.trim_end_matches('/');
        if host.is_empty() {
            return Err(Error::configuration(REGISTRY_URL, "registry url is empty"));
        }

        let base = format!("{}://{}", scheme, host);

        let client = Client::builder()
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base,
            host: host.into(),
        })
    }

    fn get(&self, path: &str, query: &[(&str, &str)], bearer: &str) -> reqwest::Result<Response> {
        let url = format!("{}/v2/{}", self.base, path);
        debug!("GET {} {:?}", url, query);

        self.client.get(url).query(query).bearer_auth(bearer).send()
    }

    fn token(&self, scope: &str, bearer: &str) -> Result<Token> {
        let query = [("service", self.host.as_str()), ("scope", scope)];

        let rep = self.get("token", &query, bearer).map_err(|e| {
            error!("unable to get token from {}: {}", self, e);
            Error::Credential(format!("Unable to get registry token: {}", e))
        })?;

        let code = rep.status();
        if !code.is_success() {
            return Err(Error::Credential(format!(
                "Invalid status code while getting registry token = {}",
                code.as_u16()
            )));
        }

        rep.json()
            .map_err(|e| Error::Credential(format!("Unable to decode registry token: {}", e)))
    }
}

impl RegistryAccess for Registry {
    fn catalog_token(&self, bearer: &str) -> Result<Token> {
        self.token("registry:catalog:*", bearer)
    }

    fn image_token(&self, project: &str, image: &str, bearer: &str) -> Result<Token> {
        let scope = format!("repository:{}/{}:pull", project, image);
        self.token(&scope, bearer)
    }

    fn tags(&self, project: &str, image: &str, bearer: &str) -> Result<TagList> {
        let path = format!("{}/{}/tags/list", project, image);

        let rep = self.get(&path, &[], bearer).map_err(|e| {
            error!("unable to get image list from {}: {}", self, e);
            Error::Transport(format!("Unable to get image list: {}", e))
        })?;

        let code = rep.status();
        if !code.is_success() {
            return Err(Error::Transport(format!(
                "Invalid status code while getting image list = {}",
                code.as_u16()
            )));
        }

        rep.json()
            .map_err(|e| Error::Transport(format!("Unable to decode image list: {}", e)))
    }
}
