// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

//! Repository and package settings: their schema, validation and typed form

use crate::error::{Error, Result};
use crate::formats::plugin::{Properties, Property, ValidationError};
use crate::revision::FilterPattern;

pub const SERVICE_ACCOUNT: &str = "GCP_SERVICE_ACCOUNT";
pub const PROJECT: &str = "GCP_PROJECT";
pub const REGISTRY_URL: &str = "GCP_REGISTRY_URL";
pub const IMAGE: &str = "DOCKER_IMAGE";
pub const TAG_FILTER: &str = "DOCKER_TAG_FILTER";

const NO_SERVICE_ACCOUNT: &str = "GCP service account key not provided";
const NO_PROJECT: &str = "GCP project not specified";
const NO_REGISTRY_URL: &str = "GCP registry url not specified";
const NO_IMAGE: &str = "Docker image not specified";

fn field(name: &str, order: u32, identity: bool, required: bool) -> Property {
    Property {
        display_name: Some(name.into()),
        display_order: Some(order.to_string()),
        part_of_identity: Some(identity),
        required: Some(required),
        ..Default::default()
    }
}

pub fn repository_schema() -> Properties {
    let account = Property {
        secure: Some(true),
        ..field("GCP Service Account Key", 0, false, true)
    };

    Properties::default()
        .with(SERVICE_ACCOUNT, account)
        .with(PROJECT, field("GCP project id", 1, true, true))
        .with(REGISTRY_URL, field("GCR url", 2, true, true))
}

pub fn package_schema() -> Properties {
    Properties::default()
        .with(IMAGE, field("Docker Image Name", 0, true, true))
        .with(
            TAG_FILTER,
            field("Docker Tag Filter Regular Expression", 1, true, false),
        )
}

/// Reports every missing repository setting, in schema order
pub fn validate_repository(props: &Properties) -> Vec<ValidationError> {
    [
        (SERVICE_ACCOUNT, NO_SERVICE_ACCOUNT),
        (PROJECT, NO_PROJECT),
        (REGISTRY_URL, NO_REGISTRY_URL),
    ]
    .into_iter()
    .filter(|(key, _)| props.value(key).is_none())
    .map(|(key, message)| ValidationError::new(key, message))
    .collect()
}

/// Reports the first problem with the image, then any problem with the filter
pub fn validate_package(props: &Properties) -> Vec<ValidationError> {
    let image = match props.get(IMAGE) {
        None => return vec![ValidationError::new(IMAGE, NO_IMAGE)],
        Some(p) => p.value.as_deref(),
    };

    match image {
        None => return vec![ValidationError::new(IMAGE, "Docker image is null")],
        Some(i) if i.trim().is_empty() => {
            return vec![ValidationError::new(IMAGE, "Docker image is empty")]
        }
        Some(..) => (),
    }

    match FilterPattern::compile(props.value(TAG_FILTER)) {
        Ok(..) => Vec::new(),
        Err(e) => vec![ValidationError::new(
            TAG_FILTER,
            format!("Docker tag filter is not a valid regular expression: {}", e),
        )],
    }
}

fn required(props: &Properties, key: &str, message: &str) -> Result<String> {
    match props.value(key).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.into()),
        _ => Err(Error::configuration(key, message)),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub service_account: String,
    pub project: String,
    pub registry_url: String,
}

impl RepositoryConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        Ok(Self {
            service_account: required(props, SERVICE_ACCOUNT, NO_SERVICE_ACCOUNT)?,
            project: required(props, PROJECT, NO_PROJECT)?,
            registry_url: required(props, REGISTRY_URL, NO_REGISTRY_URL)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageConfig {
    pub image: String,
    pub tag_filter: Option<String>,
}

impl PackageConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        Ok(Self {
            image: required(props, IMAGE, NO_IMAGE)?,
            tag_filter: props.value(TAG_FILTER).map(Into::into),
        })
    }

    pub fn filter(&self) -> Result<FilterPattern> {
        FilterPattern::compile(self.tag_filter.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(entries: &[(&str, &str)]) -> Properties {
        entries.iter().fold(Properties::default(), |p, (k, v)| {
            p.with(k, Property::with_value(*v))
        })
    }

    #[test]
    fn schemas_have_expected_keys() {
        let repo: Vec<_> = repository_schema().keys().map(String::from).collect();
        assert_eq!(repo, [PROJECT, REGISTRY_URL, SERVICE_ACCOUNT]);

        let pkg: Vec<_> = package_schema().keys().map(String::from).collect();
        assert_eq!(pkg, [IMAGE, TAG_FILTER]);
    }

    #[test]
    fn service_account_is_secure_and_not_identity() {
        let schema = repository_schema();
        let account = schema.get(SERVICE_ACCOUNT).unwrap();
        assert_eq!(account.secure, Some(true));
        assert_eq!(account.part_of_identity, Some(false));
        assert_eq!(package_schema().get(TAG_FILTER).unwrap().required, Some(false));
    }

    #[test]
    fn missing_service_account() {
        let config = props(&[(REGISTRY_URL, "gcr.io"), (PROJECT, "my-project")]);
        assert_eq!(
            validate_repository(&config),
            [ValidationError::new(SERVICE_ACCOUNT, NO_SERVICE_ACCOUNT)]
        );
    }

    #[test]
    fn missing_registry_url() {
        let config = props(&[(PROJECT, "my-project")]);
        assert_eq!(
            validate_repository(&config),
            [
                ValidationError::new(SERVICE_ACCOUNT, NO_SERVICE_ACCOUNT),
                ValidationError::new(REGISTRY_URL, NO_REGISTRY_URL),
            ]
        );
    }

    #[test]
    fn missing_project() {
        let config = props(&[(SERVICE_ACCOUNT, "{}")]);
        assert_eq!(
            validate_repository(&config),
            [
                ValidationError::new(PROJECT, NO_PROJECT),
                ValidationError::new(REGISTRY_URL, NO_REGISTRY_URL),
            ]
        );
    }

    #[test]
    fn complete_repository() {
        let config = props(&[
            (SERVICE_ACCOUNT, "{}"),
            (PROJECT, "my-project"),
            (REGISTRY_URL, "gcr.io"),
        ]);
        assert!(validate_repository(&config).is_empty());

        let typed = RepositoryConfig::from_properties(&config).unwrap();
        assert_eq!(typed.registry_url, "gcr.io");
    }

    #[test]
    fn image_problems() {
        assert_eq!(
            validate_package(&Properties::default()),
            [ValidationError::new(IMAGE, NO_IMAGE)]
        );

        let null = Properties::default().with(IMAGE, Property::default());
        assert_eq!(
            validate_package(&null),
            [ValidationError::new(IMAGE, "Docker image is null")]
        );

        assert_eq!(
            validate_package(&props(&[(IMAGE, "  ")])),
            [ValidationError::new(IMAGE, "Docker image is empty")]
        );
    }

    #[test]
    fn tag_filter_must_compile() {
        assert!(validate_package(&props(&[(IMAGE, "app"), (TAG_FILTER, "^1.*")])).is_empty());
        assert!(validate_package(&props(&[(IMAGE, "app"), (TAG_FILTER, "")])).is_empty());

        let errors = validate_package(&props(&[(IMAGE, "app"), (TAG_FILTER, "[")]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, TAG_FILTER);
    }

    #[test]
    fn typed_package_config() {
        let config = PackageConfig::from_properties(&props(&[(IMAGE, " app ")])).unwrap();
        assert_eq!(config.image, "app");
        assert!(config.filter().unwrap().matches("anything"));

        let err = PackageConfig::from_properties(&Properties::default()).unwrap_err();
        assert!(matches!(err, Error::Configuration { ref key, .. } if key == IMAGE));
    }
}
