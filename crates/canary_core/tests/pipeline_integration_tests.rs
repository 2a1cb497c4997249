//! Integration tests for the pack build pipeline.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use canary_assets::{lang_asset_path, CapturedFetch, MockFetcher};
use canary_core::{BuildError, BuildOptions, PackBuilder};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

fn write_build_file(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("icecanary.yml");
    fs::write(&path, content).unwrap();
    path
}

fn read_json(path: impl AsRef<Path>) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

/// A project with every stage configured.
fn full_project(packformat: u32) -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fs::write(root.join("icon.png"), [0x89u8, b'P', b'N', b'G']).unwrap();

    fs::create_dir_all(root.join("lang")).unwrap();
    fs::write(
        root.join("lang/plain.json"),
        r#"{"menu.quit": "Leave", "menu.play": "Play"}"#,
    )
    .unwrap();
    fs::write(
        root.join("lang/meme.yml"),
        "menu:\n  quit: 溜了\nitem:\n  minecraft:\n    stone: 石头\n",
    )
    .unwrap();

    fs::create_dir_all(root.join("raw/MyMod/Textures")).unwrap();
    fs::write(root.join("raw/MyMod/Textures/Gem.png"), [1u8, 2, 3, 4]).unwrap();
    fs::write(root.join("raw/MyMod/sounds.json"), "{}").unwrap();

    fs::create_dir_all(root.join("extra")).unwrap();
    fs::write(root.join("extra/LICENSE.txt"), "MIT").unwrap();

    write_build_file(
        root,
        &format!(
            r#"
name: Canary
version: 2.0
description: Full pack
mcver: 1.16.5
packformat: {packformat}
icon: '{root}/icon.png'
languages:
  en_PLAIN:
    name: Plain
    region: Test
    ns: MyMod
    data:
      file: '{root}/lang/plain.json'
  zh_meme:
    name: Meme
    region: China
    data:
      file: '{root}/lang/meme.yml'
      format: yaml
      objective: true
      type: merge
raw:
  MyMod: '{root}/raw/MyMod'
archive_raw: '{root}/extra'
"#,
            packformat = packformat,
            root = root.display()
        ),
    );

    temp
}

fn upstream_fetcher(version: &str) -> MockFetcher {
    MockFetcher::new().with_asset(
        version,
        &lang_asset_path("zh_CN"),
        r#"{"menu.quit": "退出游戏", "menu.options": "选项"}"#,
    )
}

#[tokio::test]
async fn test_minimal_pack_produces_single_entry_archive() {
    let temp = tempdir().unwrap();
    let build_file = write_build_file(
        temp.path(),
        "name: Test\nversion: '1.0'\nmcver: 1.16.5\npackformat: 4\n",
    );
    let out = temp.path().join("outputs");
    let fetcher = MockFetcher::new();

    let report = PackBuilder::new(BuildOptions::new(&build_file, &out), Arc::new(fetcher.clone()))
        .build()
        .await
        .unwrap();

    let archive_path = out.join("Test-1.16.5-1.0.zip");
    assert_eq!(report.archive, Some(archive_path.clone()));
    assert_eq!(report.files_written, 1);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    assert_eq!(fetcher.call_count(), 0);

    let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);

    let mut content = String::new();
    archive
        .by_name("pack.mcmeta")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    let meta: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(meta, json!({"pack": {"pack_format": 4}}));
    assert!(meta.get("language").is_none());
}

#[tokio::test]
async fn test_full_directory_build() {
    let project = full_project(6);
    let root = project.path();
    let out = root.join("outputs");
    let fetcher = upstream_fetcher("1.16.5");

    let options = BuildOptions::new(root.join("icecanary.yml"), &out).directory();
    let report = PackBuilder::new(options, Arc::new(fetcher.clone()))
        .build()
        .await
        .unwrap();

    assert!(report.archive.is_none());
    assert_eq!(report.merged_languages, vec!["zh_meme".to_string()]);
    assert_eq!(report.pack, "Canary-2");

    // Metadata
    let meta = read_json(out.join("pack.mcmeta"));
    assert_eq!(meta["pack"], json!({"description": "Full pack", "pack_format": 6}));
    assert_eq!(
        meta["language"]["zh_meme"],
        json!({"name": "Meme", "region": "China", "bidirectional": false})
    );

    // Icon
    assert_eq!(fs::read(out.join("pack.png")).unwrap(), vec![0x89u8, b'P', b'N', b'G']);

    // Plain language, lowercased path, texts untouched
    assert_eq!(
        read_json(out.join("assets/mymod/lang/en_plain.json")),
        json!({"menu.quit": "Leave", "menu.play": "Play"})
    );

    // Merged objective language: local wins, upstream fills the gaps
    assert_eq!(
        read_json(out.join("assets/minecraft/lang/zh_meme.json")),
        json!({
            "menu.quit": "溜了",
            "item.minecraft.stone": "石头",
            "menu.options": "选项"
        })
    );

    // Raw copy, byte identical, lowercased
    assert_eq!(
        fs::read(out.join("assets/mymod/textures/gem.png")).unwrap(),
        vec![1u8, 2, 3, 4]
    );
    assert!(out.join("assets/mymod/sounds.json").exists());

    // Archive raw at the root
    assert_eq!(fs::read_to_string(out.join("license.txt")).unwrap(), "MIT");

    assert_eq!(
        fetcher.captured(),
        vec![CapturedFetch {
            version: "1.16.5".to_string(),
            path: "assets/minecraft/lang/zh_CN.json".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_full_archive_build_lists_every_entry_once() {
    let project = full_project(6);
    let root = project.path();
    let out = root.join("outputs");

    let options = BuildOptions::new(root.join("icecanary.yml"), &out);
    let report = PackBuilder::new(options, Arc::new(upstream_fetcher("1.16.5")))
        .build()
        .await
        .unwrap();

    let archive_path = report.archive.unwrap();
    assert_eq!(archive_path, out.join("Canary-1.16.5-2.zip"));

    let archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "assets/minecraft/lang/zh_meme.json",
            "assets/mymod/lang/en_plain.json",
            "assets/mymod/sounds.json",
            "assets/mymod/textures/gem.png",
            "license.txt",
            "pack.mcmeta",
            "pack.png",
        ]
    );

    let comment = String::from_utf8(archive.comment().to_vec()).unwrap();
    assert!(comment.starts_with("Generated by IceCanary\nPack Name: Canary\n"));
    assert!(comment.contains("Target Minecraft Version: 1.16.5"));
}

#[tokio::test]
async fn test_old_pack_format_keeps_case() {
    let project = full_project(2);
    let root = project.path();
    let out = root.join("outputs");

    let options = BuildOptions::new(root.join("icecanary.yml"), &out).directory();
    PackBuilder::new(options, Arc::new(upstream_fetcher("1.16.5")))
        .build()
        .await
        .unwrap();

    assert!(out.join("assets/MyMod/lang/en_PLAIN.json").exists());
    assert!(out.join("assets/MyMod/Textures/Gem.png").exists());
    assert!(out.join("LICENSE.txt").exists());
}

#[tokio::test]
async fn test_mc_version_override_only_affects_fetch() {
    let project = full_project(6);
    let root = project.path();
    let out = root.join("outputs");
    let fetcher = upstream_fetcher("1.20.1");

    let options = BuildOptions::new(root.join("icecanary.yml"), &out).with_mc_version("1.20.1");
    let report = PackBuilder::new(options, Arc::new(fetcher.clone()))
        .build()
        .await
        .unwrap();

    assert_eq!(report.archive, Some(out.join("Canary-1.16.5-2.zip")));
    assert_eq!(fetcher.captured()[0].version, "1.20.1");
}

#[tokio::test]
async fn test_non_merge_languages_never_fetch() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(root.join("a.json"), r#"{"k": "v"}"#).unwrap();
    let build_file = write_build_file(
        root,
        &format!(
            "name: T\nversion: 1\nmcver: 1.16.5\npackformat: 4\nlanguages:\n  xx_xx:\n    name: X\n    region: Y\n    data:\n      file: '{}/a.json'\n",
            root.display()
        ),
    );
    let fetcher = MockFetcher::new();

    let options = BuildOptions::new(&build_file, root.join("outputs")).directory();
    let report = PackBuilder::new(options, Arc::new(fetcher.clone()))
        .build()
        .await
        .unwrap();

    assert_eq!(fetcher.call_count(), 0);
    assert!(report.merged_languages.is_empty());
    assert_eq!(
        read_json(root.join("outputs/assets/minecraft/lang/xx_xx.json")),
        json!({"k": "v"})
    );
}

#[tokio::test]
async fn test_unsupported_language_format() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(root.join("a.toml"), "k = 'v'").unwrap();
    let build_file = write_build_file(
        root,
        &format!(
            "name: T\nversion: 1\nmcver: 1.16.5\npackformat: 4\nlanguages:\n  xx_xx:\n    name: X\n    region: Y\n    data:\n      file: '{}/a.toml'\n      format: toml\n",
            root.display()
        ),
    );

    let options = BuildOptions::new(&build_file, root.join("outputs"));
    let err = PackBuilder::new(options, Arc::new(MockFetcher::new()))
        .build()
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::UnsupportedFormat { .. }));
    assert!(err.is_config_error());
}

#[tokio::test]
async fn test_unparseable_build_file() {
    let temp = tempdir().unwrap();
    let build_file = write_build_file(temp.path(), "name: [unclosed\n");

    let options = BuildOptions::new(&build_file, temp.path().join("outputs"));
    let err = PackBuilder::new(options, Arc::new(MockFetcher::new()))
        .build()
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::ConfigParse { .. }));
}

#[tokio::test]
async fn test_failed_fetch_fails_build_without_archive() {
    let project = full_project(6);
    let root = project.path();
    let out = root.join("outputs");

    let options = BuildOptions::new(root.join("icecanary.yml"), &out);
    let err = PackBuilder::new(options, Arc::new(MockFetcher::new()))
        .build()
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::Asset(_)));
    assert!(err.is_upstream_error());
    assert!(!out.join("Canary-1.16.5-2.zip").exists());
}

#[tokio::test]
async fn test_stalled_fetch_times_out() {
    let project = full_project(6);
    let root = project.path();

    let options = BuildOptions::new(root.join("icecanary.yml"), root.join("outputs"))
        .with_merge_timeout(Some(Duration::from_millis(100)));
    let err = PackBuilder::new(options, Arc::new(MockFetcher::new().hanging()))
        .build()
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::MergeTimeout(_)));
}

#[tokio::test]
async fn test_slow_fetch_is_awaited_before_finalize() {
    let project = full_project(6);
    let root = project.path();
    let out = root.join("outputs");
    let fetcher = upstream_fetcher("1.16.5").with_delay(Duration::from_millis(50));

    let options = BuildOptions::new(root.join("icecanary.yml"), &out);
    let report = PackBuilder::new(options, Arc::new(fetcher))
        .build()
        .await
        .unwrap();

    let archive = zip::ZipArchive::new(File::open(report.archive.unwrap()).unwrap()).unwrap();
    assert!(archive
        .file_names()
        .any(|name| name == "assets/minecraft/lang/zh_meme.json"));
}

#[tokio::test]
async fn test_rebuild_empties_output_directory() {
    let project = full_project(6);
    let root = project.path();
    let out = root.join("outputs");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale.txt"), "old").unwrap();

    let options = BuildOptions::new(root.join("icecanary.yml"), &out);
    PackBuilder::new(options, Arc::new(upstream_fetcher("1.16.5")))
        .build()
        .await
        .unwrap();

    assert!(!out.join("stale.txt").exists());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}
