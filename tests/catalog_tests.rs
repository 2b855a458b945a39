//! Catalog loading from disk
//!
//! Loading is the one place configuration errors are fatal: unreadable or
//! malformed files and a region missing from the standard catalog must all
//! fail before a selector is ever constructed.

use costctl::catalog::CatalogStore;
use costctl::error::{ConfigError, CostctlError};
use costctl::provider::CloudProvider;
use std::path::Path;
use tempfile::TempDir;

const AWS_INSTANCE_DATA: &str = r#"{
    "us-east-1": [
        {"instanceType": "t3.micro", "price": 0.0104, "cpu": 2, "memory": 1.0,
         "burstable": true, "baseline": 0.2},
        {"instanceType": "m5.large", "price": 0.096, "cpu": 2, "memory": 8.0}
    ],
    "eu-west-1": [
        {"instanceType": "m5.large", "price": 0.107, "cpu": 2, "memory": 8.0}
    ]
}"#;

const GCE_CUSTOM_DATA: &str = r#"{
    "us-west1-a": [
        {"instanceFamily": "n1", "baseMemoryUnit": 0.25,
         "possibleNumberOfCPUs": [1, 2, 4, 8],
         "minimumMemoryPerCPU": 0.9, "maximumMemoryPerCPU": 6.5,
         "pricePerCPU": 0.033174, "pricePerGBOfMemory": 0.004446}
    ]
}"#;

const GCE_INSTANCE_DATA: &str = r#"{
    "us-west1-a": [
        {"instanceType": "n1-standard-1", "price": 0.0475, "cpu": 1, "memory": 3.75}
    ]
}"#;

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn loads_the_requested_region() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "aws_instance_data.json", AWS_INSTANCE_DATA);

    let store = CatalogStore::load(dir.path(), CloudProvider::Aws, "us-east-1").unwrap();
    assert_eq!(store.instances().len(), 2);
    assert!(store.custom_families().is_empty());
    assert_eq!(store.instances()[0].instance_type, "t3.micro");
    assert!(store.instances()[0].burstable);
}

#[test]
fn custom_family_file_is_optional() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "gce_instance_data.json", GCE_INSTANCE_DATA);
    write(dir.path(), "gce_custom_instance_data.json", GCE_CUSTOM_DATA);

    let store = CatalogStore::load(dir.path(), CloudProvider::Gce, "us-west1-a").unwrap();
    assert_eq!(store.custom_families().len(), 1);
    assert_eq!(store.custom_families()[0].instance_family, "n1");
}

#[test]
fn region_absent_from_custom_file_means_no_families() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "gce_instance_data.json",
        r#"{"europe-west1-b": [{"instanceType": "n1-standard-1", "price": 0.052, "cpu": 1, "memory": 3.75}]}"#,
    );
    write(dir.path(), "gce_custom_instance_data.json", GCE_CUSTOM_DATA);

    let store = CatalogStore::load(dir.path(), CloudProvider::Gce, "europe-west1-b").unwrap();
    assert!(store.custom_families().is_empty());
}

#[test]
fn missing_region_is_a_fatal_config_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "aws_instance_data.json", AWS_INSTANCE_DATA);

    let err = CatalogStore::load(dir.path(), CloudProvider::Aws, "ap-south-1").unwrap_err();
    assert!(matches!(
        err,
        CostctlError::Config(ConfigError::UnknownRegion { .. })
    ));
}

#[test]
fn missing_catalog_file_is_a_fatal_config_error() {
    let dir = TempDir::new().unwrap();
    let err = CatalogStore::load(dir.path(), CloudProvider::Aws, "us-east-1").unwrap_err();
    assert!(matches!(
        err,
        CostctlError::Config(ConfigError::CatalogNotFound(_))
    ));
}

#[test]
fn malformed_catalog_is_a_fatal_config_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "aws_instance_data.json", "{not json");

    let err = CatalogStore::load(dir.path(), CloudProvider::Aws, "us-east-1").unwrap_err();
    assert!(matches!(
        err,
        CostctlError::Config(ConfigError::CatalogParse { .. })
    ));
}

#[test]
fn malformed_custom_file_is_a_fatal_config_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "gce_instance_data.json", GCE_INSTANCE_DATA);
    write(dir.path(), "gce_custom_instance_data.json", "[]");

    let err = CatalogStore::load(dir.path(), CloudProvider::Gce, "us-west1-a").unwrap_err();
    assert!(matches!(
        err,
        CostctlError::Config(ConfigError::CatalogParse { .. })
    ));
}
