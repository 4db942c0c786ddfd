use super::*;
use serde_json::json;
use std::io::Cursor;
use tempfile::TempDir;

fn sample_builder() -> PackBuilder {
    let mut builder = PackBuilder::new();
    builder
        .set_name("Weekend Pack")
        .set_readme("# Weekend Pack")
        .add_image(b"cover".to_vec(), ".PNG", Some("Cover"));

    let mut plugin_data = Map::new();
    plugin_data.insert("GameBanana".into(), json!({ "ItemId": 408376 }));

    builder
        .add_mod_item("reloaded.sharedlib.hooks")
        .set_name("Shared Hooks")
        .set_summary("Hooking library")
        .set_plugin_data(plugin_data)
        .add_image(b"one".to_vec(), "jpg", None)
        .add_image(b"two".to_vec(), "webp", Some("Second"));

    builder.add_mod_item("sonic/heroes tweaks");
    builder
}

fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    data
}

#[test]
fn test_manifest_layout() {
    let manifest = sample_builder().manifest().unwrap();

    assert_eq!(manifest.name, "Weekend Pack");
    assert_eq!(
        manifest.images,
        vec![PackImage {
            path: "images/0.png".into(),
            caption: Some("Cover".into())
        }]
    );

    let hooks = &manifest.items[0];
    assert_eq!(hooks.name, "Shared Hooks");
    assert_eq!(hooks.summary.as_deref(), Some("Hooking library"));
    assert_eq!(hooks.readme, None);
    let paths: Vec<&str> = hooks.images.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "items/reloaded.sharedlib.hooks/0.jpg",
            "items/reloaded.sharedlib.hooks/1.webp"
        ]
    );
    assert_eq!(hooks.plugin_data["GameBanana"]["ItemId"], 408376);

    // Unnamed item defaults to its id
    assert_eq!(manifest.items[1].name, "sonic/heroes tweaks");
}

#[test]
fn test_build_writes_manifest_and_images() {
    let builder = sample_builder();
    let mut buffer = Cursor::new(Vec::new());
    let written = builder.build(&mut buffer).unwrap();
    let bytes = buffer.into_inner();

    let read_back = PackManifest::read_from_archive(Cursor::new(bytes.as_slice())).unwrap();
    assert_eq!(read_back, written);

    assert_eq!(read_entry(&bytes, "images/0.png"), b"cover");
    assert_eq!(read_entry(&bytes, "items/reloaded.sharedlib.hooks/1.webp"), b"two");
}

#[test]
fn test_write_to_path_creates_parents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("weekend.zip");

    sample_builder().write_to_path(&path).unwrap();

    let manifest = PackManifest::read_from_archive(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(manifest.items.len(), 2);
}

#[test]
fn test_empty_name_rejected() {
    let builder = PackBuilder::new();
    assert!(matches!(builder.manifest(), Err(PackError::EmptyName)));
}

#[test]
fn test_duplicate_items_rejected() {
    let mut builder = PackBuilder::new();
    builder.set_name("Dupes");
    builder.add_mod_item("a.mod");
    builder.add_mod_item("a.mod");

    assert!(matches!(
        builder.manifest(),
        Err(PackError::DuplicateItem { ref mod_id }) if mod_id == "a.mod"
    ));

    assert!(builder.remove_mod_item("a.mod"));
    assert!(!builder.remove_mod_item("a.mod"));
    assert!(builder.manifest().is_ok());
}

#[test]
fn test_sanitize_path_segment() {
    assert_eq!(sanitize_path_segment("reloaded.sharedlib.hooks"), "reloaded.sharedlib.hooks");
    assert_eq!(sanitize_path_segment("sonic/heroes tweaks"), "sonic_heroes_tweaks");
    assert_eq!(sanitize_path_segment(".."), "_");
    assert_eq!(sanitize_path_segment("..\\evil"), "_evil");
}

#[test]
fn test_colliding_segments_get_distinct_directories() {
    let mut builder = PackBuilder::new();
    builder.set_name("Collisions");
    builder.add_mod_item("a/b").add_image(b"slash".to_vec(), "png", None);
    builder.add_mod_item("a_b").add_image(b"underscore".to_vec(), "png", None);
    builder.add_mod_item("a?b").add_image(b"question".to_vec(), "png", None);

    let mut buffer = Cursor::new(Vec::new());
    let manifest = builder.build(&mut buffer).unwrap();
    let bytes = buffer.into_inner();

    let paths: Vec<&str> = manifest
        .items
        .iter()
        .map(|item| item.images[0].path.as_str())
        .collect();
    assert_eq!(
        paths,
        vec!["items/a_b/0.png", "items/a_b-2/0.png", "items/a_b-3/0.png"]
    );
    assert_eq!(read_entry(&bytes, "items/a_b/0.png"), b"slash");
    assert_eq!(read_entry(&bytes, "items/a_b-2/0.png"), b"underscore");
    assert_eq!(read_entry(&bytes, "items/a_b-3/0.png"), b"question");
}
