//! Integration tests for image configuration and storage

use azure_arm_images::{
    apply_passwords, AzureCloudImageDetails, CloneBehaviour, CloudImageDetails,
    CloudImagePasswordDetails, Error, ImageRegistry, ImageStore, PasswordMap,
};

const IMAGES_DATA: &str = r#"[
    {"groupId":"rg1","storageId":"acct1","imagePath":"images/base.vhd","maxInstances":5,
     "vmSize":"Standard_D2","vmNamePrefix":"agent-","vmUsername":"admin"},
    {"groupId":"rg2","storageId":"acct2","imagePath":"vhds/win.vhd","maxInstances":2,
     "vmSize":"Standard_A4","vmNamePrefix":"win-","vmUsername":"builder"}
]"#;

#[test]
fn test_profile_example() {
    let mut image = AzureCloudImageDetails::new(
        "rg1",
        "acct1",
        "images/base.vhd",
        "agent-",
        "Standard_D2",
        5,
        "admin",
    );

    assert_eq!(image.source_name(), "https://acct1.blob.core.windows.net/images/base.vhd");
    assert_eq!(image.max_instances(), 5);
    assert_eq!(image.behaviour(), CloneBehaviour::FreshClone);

    assert!(image.password().is_none());
    image.set_password(Some("secret".to_string()));
    assert_eq!(image.password(), Some("secret"));
    image.set_password(None);
    assert!(image.password().is_none());
}

#[test]
fn test_parse_and_apply_passwords() {
    let mut images: Vec<AzureCloudImageDetails> = serde_json::from_str(IMAGES_DATA).unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[1].username(), "builder");

    let mut passwords = PasswordMap::new();
    passwords.insert("https://acct2.blob.core.windows.net/vhds/win.vhd", "w1n");

    assert_eq!(apply_passwords(&mut images, &passwords), 1);
    assert!(images[0].password().is_none());
    assert_eq!(images[1].password(), Some("w1n"));
}

#[test]
fn test_store_roundtrip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::in_dir(dir.path());

    let registry = ImageRegistry::from_json(IMAGES_DATA, "").unwrap();
    registry
        .set_password("https://acct1.blob.core.windows.net/images/base.vhd", Some("secret".to_string()))
        .unwrap();
    store.save(&registry).unwrap();

    let images_file = std::fs::read_to_string(store.images_path()).unwrap();
    assert!(images_file.contains("\"vmNamePrefix\":\"agent-\""));
    assert!(!images_file.contains("secret"));

    let loaded = store.load().unwrap();
    let sources: Vec<String> = loaded.list().iter().map(|i| i.source_name()).collect();
    assert_eq!(
        sources,
        vec![
            "https://acct1.blob.core.windows.net/images/base.vhd".to_string(),
            "https://acct2.blob.core.windows.net/vhds/win.vhd".to_string(),
        ]
    );
    assert_eq!(loaded.list()[0].password(), Some("secret"));
    assert!(loaded.list()[1].password().is_none());
}

#[test]
fn test_edit_and_delete_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::in_dir(dir.path());

    let registry = store.load().unwrap();
    let original = registry
        .save(
            None,
            AzureCloudImageDetails::builder()
                .group_id("rg1")
                .storage_id("acct1")
                .image_path("a.vhd")
                .vm_prefix("a-")
                .vm_size("Standard_D2")
                .username("admin")
                .password("one")
                .build_validated()
                .unwrap(),
            Some("one".to_string()),
        )
        .unwrap();

    let edited = AzureCloudImageDetails::new("rg1", "acct1", "b.vhd", "b-", "Standard_D4", 3, "admin");
    let updated = registry.save(Some(original.as_str()), edited, Some("two".to_string())).unwrap();
    store.save(&registry).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.get(&original).is_none());
    let image = loaded.get(&updated).unwrap();
    assert_eq!(image.vm_size(), "Standard_D4");
    assert_eq!(image.password(), Some("two"));

    loaded.delete(&updated).unwrap();
    store.save(&loaded).unwrap();

    let reloaded = store.load().unwrap();
    assert!(reloaded.is_empty());
    assert!(matches!(reloaded.delete(&updated), Err(Error::ImageNotFound(_))));
}

#[test]
fn test_set_password_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::in_dir(dir.path());
    let source = "https://acct2.blob.core.windows.net/vhds/win.vhd";

    let registry = ImageRegistry::from_json(IMAGES_DATA, "").unwrap();
    registry.set_password(source, Some("w1n".to_string())).unwrap();
    store.save(&registry).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.get(source).unwrap().password(), Some("w1n"));

    loaded.set_password(source, None).unwrap();
    store.save(&loaded).unwrap();

    let reloaded = store.load().unwrap();
    assert!(reloaded.get(source).unwrap().password().is_none());
    assert_eq!(std::fs::read_to_string(store.passwords_path()).unwrap(), "{}");
}
