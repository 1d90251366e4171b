//! End-to-end tests for preset loading through the store

use prompt_helper_core::preset::{
    AdapterRef, ErrorPolicy, LoadOptions, PresetEntry, PresetError, PresetKind, PresetStore, load,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(path, content).expect("Failed to write fixture");
}

fn preset_tree() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    write(
        root,
        "styles.csv",
        "name,prompt\nwatercolor,\"watercolor, soft edges\"\nnoir, high contrast  \n",
    );
    write(
        root,
        "subjects/animals.yaml",
        "cats:\n  - tabby cat, striped\n  - black cat\nbirds:\n  owl: snowy owl\n",
    );
    write(
        root,
        "characters.json",
        r#"{
            "knight": {
                "positive_prompt": "armored knight",
                "negative_prompt": "blurry",
                "lora": { "lora_name": "armor.safetensors", "weight": 0.8 }
            },
            "mage": {
                "positive_prompt": "robed mage",
                "loras": [
                    { "lora_name": "robes.safetensors", "strength_model": 0.6, "strength_clip": 0.4 }
                ]
            }
        }"#,
    );
    write(root, ".git/config.yml", "ignored: true\n");
    write(root, "notes.txt", "not a preset");
    temp_dir
}

#[test]
fn test_flattens_every_format() {
    let temp_dir = preset_tree();
    let store = PresetStore::new(temp_dir.path(), LoadOptions::default());

    let keys = store.keys().expect("Failed to list presets");
    assert_eq!(
        keys,
        vec![
            "characters: knight",
            "characters: mage",
            "styles: watercolor",
            "styles: noir",
            "animals: cats.tabby cat",
            "animals: cats.black cat",
            "animals: birds.owl",
        ]
    );

    assert_eq!(
        store.get_text("styles: noir").expect("noir preset"),
        " high contrast  "
    );
    assert_eq!(
        store.get_text("animals: cats.tabby cat").expect("tabby preset"),
        "tabby cat, striped"
    );
}

#[test]
fn test_structured_presets_resolve_adapters() {
    let temp_dir = preset_tree();
    let store = PresetStore::new(temp_dir.path(), LoadOptions::default());

    let knight = store.get_structured("characters: knight").expect("knight preset");
    assert_eq!(knight.negative_prompt, "blurry");
    assert_eq!(knight.adapters, vec![AdapterRef::new("armor.safetensors", 0.8, 0.8)]);

    let mage = store.get_structured("characters: mage").expect("mage preset");
    assert_eq!(mage.negative_prompt, "");
    assert!(mage.primary.is_none());
    assert_eq!(mage.adapters, vec![AdapterRef::new("robes.safetensors", 0.6, 0.4)]);

    let structured = store
        .keys_of(PresetKind::Structured)
        .expect("Failed to list structured presets");
    assert_eq!(structured.len(), 2);
}

#[test]
fn test_load_is_idempotent() {
    let temp_dir = preset_tree();
    let first = load(temp_dir.path(), &LoadOptions::default()).expect("first load");
    let second = load(temp_dir.path(), &LoadOptions::default()).expect("second load");
    assert_eq!(first.entries(), second.entries());
    assert_eq!(first.sources(), second.sources());
}

#[test]
fn test_empty_directory_yields_empty_mapping() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    write(temp_dir.path(), "readme.md", "# presets");

    let snapshot = load(temp_dir.path(), &LoadOptions::default()).expect("load empty dir");
    assert!(snapshot.is_empty());
    assert!(snapshot.sources().is_empty());
}

#[test]
fn test_missing_directory_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = PresetStore::new(temp_dir.path().join("absent"), LoadOptions::default());

    let err = store.presets().expect_err("missing directory must fail");
    assert!(matches!(err, PresetError::DirectoryNotFound(_)));
    assert!(!store.is_loaded());
}

#[test]
fn test_skip_policy_keeps_valid_files() {
    let temp_dir = preset_tree();
    write(temp_dir.path(), "broken.yml", "a: [1, 2\n");

    let aborting = PresetStore::new(temp_dir.path(), LoadOptions::default());
    let err = aborting.presets().expect_err("abort policy must fail");
    assert!(err.to_string().contains("broken.yml"));

    let skipping = PresetStore::new(temp_dir.path(), LoadOptions::with_policy(ErrorPolicy::Skip));
    let snapshot = skipping.presets().expect("skip policy must succeed");
    assert_eq!(snapshot.len(), 7);
    assert_eq!(snapshot.skipped().len(), 1);
}

#[test]
fn test_reload_picks_up_changes() {
    let temp_dir = preset_tree();
    let store = PresetStore::new(temp_dir.path(), LoadOptions::default());
    assert_eq!(store.keys().expect("initial load").len(), 7);

    write(temp_dir.path(), "zz_override.csv", "name,prompt\nnoir,film noir\n");
    fs::remove_file(temp_dir.path().join("characters.json")).expect("remove json");

    let snapshot = store.reload().expect("reload");
    assert_eq!(snapshot.len(), 6);
    assert_eq!(
        snapshot.get("zz_override: noir"),
        Some(&PresetEntry::simple("film noir"))
    );
    assert!(!snapshot.contains("characters: knight"));
}
