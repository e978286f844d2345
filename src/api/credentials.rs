// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

//! Exchange of a service account key for an OAuth access token

use crate::error::{Error, Result};

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use log::{debug, error};
use reqwest::blocking::Client;
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RSA_PKCS1_SHA256};
use serde::{Deserialize, Serialize};

const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/devstorage.read_write",
];

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const LIFETIME_SECS: u64 = 3600;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".into()
}

#[derive(Deserialize)]
struct Key {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

#[derive(Serialize)]
struct Header<'a> {
    alg: &'a str,
    typ: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<&'a str>,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct Grant {
    access_token: String,
}

fn segment<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value)
        .map_err(|e| Error::Credential(format!("unable to encode token request: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decodes the base64 body of a PEM block
fn pem_to_der(pem: &str) -> Result<Vec<u8>> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("-----"))
        .collect();

    STANDARD
        .decode(body)
        .map_err(|e| Error::Credential(format!("malformed private key: {}", e)))
}

/// A parsed service account key able to mint access tokens
pub struct ServiceAccount {
    email: String,
    key_id: Option<String>,
    token_uri: String,
    key: RsaKeyPair,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("email", &self.email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccount {
    pub fn from_json(blob: &str) -> Result<Self> {
        if blob.trim().is_empty() {
            return Err(Error::Credential("service account key is empty".into()));
        }

        let key: Key = serde_json::from_str(blob)
            .map_err(|e| Error::Credential(format!("malformed service account key: {}", e)))?;

        let der = pem_to_der(&key.private_key)?;
        let pair = RsaKeyPair::from_pkcs8(&der)
            .map_err(|e| Error::Credential(format!("unusable private key: {}", e)))?;

        Ok(Self {
            email: key.client_email,
            key_id: key.private_key_id,
            token_uri: key.token_uri,
            key: pair,
        })
    }

    /// Builds the signed JWT presented to the token endpoint
    fn assertion(&self, issued_at: u64) -> Result<String> {
        let header = Header {
            alg: "RS256",
            typ: "JWT",
            kid: self.key_id.as_deref(),
        };

        let claims = Claims {
            iss: &self.email,
            scope: SCOPES.join(" "),
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + LIFETIME_SECS,
        };

        let message = format!("{}.{}", segment(&header)?, segment(&claims)?);

        let mut signature = vec![0; self.key.public().modulus_len()];
        self.key
            .sign(
                &RSA_PKCS1_SHA256,
                &SystemRandom::new(),
                message.as_bytes(),
                &mut signature,
            )
            .map_err(|_| Error::Credential("unable to sign token request".into()))?;

        Ok(format!("{}.{}", message, URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Exchanges the key for a short-lived bearer token
    pub fn access_token(&self) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::Credential(format!("system clock is before the epoch: {}", e)))?
            .as_secs();

        let assertion = self.assertion(now)?;
        debug!("requesting access token for {}", self.email);

        let client = Client::builder()
            .build()
            .map_err(|e| Error::Credential(e.to_string()))?;

        let rep = client
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| {
                error!("unable to reach {}: {}", self.token_uri, e);
                Error::Credential(format!("Unable to get access token: {}", e))
            })?;

        let code = rep.status();
        if !code.is_success() {
            return Err(Error::Credential(format!(
                "Invalid status code while getting access token = {}",
                code.as_u16()
            )));
        }

        let grant: Grant = rep
            .json()
            .map_err(|e| Error::Credential(format!("Unable to decode access token: {}", e)))?;

        Ok(grant.access_token)
    }
}
