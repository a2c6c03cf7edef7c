use std::fs;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use rlic::key_generation::{Ed25519Generator, KeyPairGenerator};
use rlic::project::{License, LicenseType, Project};
use rlic::store::{JsonProjectStore, ProjectStore};
use rlic::StoreError;

fn populated_project() -> Project {
    let mut project = Project::new("Acme Widgets \u{2122}");
    project
        .product
        .set_key_pair(Ed25519Generator::new().generate().unwrap());

    let base = Utc.with_ymd_and_hms(2031, 2, 28, 23, 59, 59).unwrap()
        + Duration::nanoseconds(123_456_789);
    for (i, license_type) in LicenseType::ALL.into_iter().enumerate() {
        project.product.add_license(License::new(
            base + Duration::days(i as i64 * 7),
            license_type,
            format!("Owner {i}"),
        ));
    }
    project
}

#[test]
fn round_trip_preserves_whole_graph() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("acme.rlic");
    let store = JsonProjectStore::new();
    let original = populated_project();

    store.save(&original, &path).expect("save should succeed");
    let loaded = store.open(&path).expect("open should succeed");

    assert_eq!(loaded, original);
    assert_eq!(loaded.product.public_key(), original.product.public_key());
    assert_eq!(loaded.product.private_key(), original.product.private_key());

    let owners: Vec<&str> = loaded
        .product
        .issued_licenses()
        .iter()
        .map(|l| l.owner_name.as_str())
        .collect();
    assert_eq!(owners, ["Owner 0", "Owner 1", "Owner 2", "Owner 3", "Owner 4"]);
    assert_eq!(
        loaded.product.issued_licenses()[0].expiration_date,
        original.product.issued_licenses()[0].expiration_date
    );
}

#[test]
fn round_trip_of_keyless_project() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bare.rlic");
    let store = JsonProjectStore::new();

    store.save(&Project::new("Bare"), &path).unwrap();
    let loaded = store.open(&path).unwrap();

    assert_eq!(loaded, Project::new("Bare"));
    assert!(loaded.product.key_pair().is_none());
}

#[test]
fn save_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("acme.rlic");
    let store = JsonProjectStore::new();

    store.save(&populated_project(), &path).unwrap();
    store.save(&Project::new("Replaced"), &path).unwrap();

    assert_eq!(store.open(&path).unwrap().product.name, "Replaced");
    let leftovers = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1, "temporary files must not be left behind");
}

#[test]
fn truncated_file_is_corrupt_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("acme.rlic");
    let store = JsonProjectStore::new();
    store.save(&populated_project(), &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 10]).unwrap();

    match store.open(&path) {
        Err(StoreError::CorruptData { path: p, message }) => {
            assert_eq!(p, path);
            assert!(message.contains("truncated"), "unexpected message: {message}");
        }
        other => panic!("expected CorruptData, got {other:?}"),
    }
}

#[test]
fn non_json_file_is_corrupt_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.rlic");
    fs::write(&path, "<License><Owner>John</Owner></License>").unwrap();

    assert!(matches!(
        JsonProjectStore::new().open(&path),
        Err(StoreError::CorruptData { .. })
    ));
}
