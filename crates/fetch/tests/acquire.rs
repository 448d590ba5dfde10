//! End-to-end pipeline coverage over local archives: extract, subtree
//! selection, publish, and the cache short-circuit, composed through the
//! public API the installers use.

use std::io::Write;
use std::path::Path;

use tempfile::TempDir;
use vhs_action_core::ToolCache;
use vhs_action_fetch::{AcquirePlan, ArchiveKind, acquire, asset_stem, extract};

fn make_tar_gz(dest: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(dest).unwrap();
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

fn make_zip(dest: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(dest).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

#[tokio::test]
async fn extracted_release_archive_publishes_and_is_found_again() {
    let temp = TempDir::new().unwrap();
    let cache = ToolCache::new(temp.path().join("cache"));

    // A release archive shaped like a static ffmpeg build: one versioned
    // root directory wrapping the payload.
    let archive = temp.path().join("ffmpeg-6.0-amd64-static.tar.gz");
    make_tar_gz(
        &archive,
        &[
            ("ffmpeg-6.0-amd64-static/ffmpeg", b"ff-binary"),
            ("ffmpeg-6.0-amd64-static/GPLv3.txt", b"license"),
        ],
    );

    let extracted = temp.path().join("extracted");
    extract(&archive, &extracted, ArchiveKind::TarGz, 1)
        .await
        .unwrap();
    assert_eq!(
        std::fs::read(extracted.join("ffmpeg")).unwrap(),
        b"ff-binary"
    );

    let entry = cache.store(&extracted, "ffmpeg", "release").unwrap();
    assert_eq!(cache.find("ffmpeg", "release").unwrap(), entry);
    assert_eq!(std::fs::read(entry.join("ffmpeg")).unwrap(), b"ff-binary");
}

#[tokio::test]
async fn acquire_serves_populated_entries_without_any_network() {
    let temp = TempDir::new().unwrap();
    let cache = ToolCache::new(temp.path().join("cache"));

    let staged = temp.path().join("staged");
    std::fs::create_dir_all(&staged).unwrap();
    std::fs::write(staged.join("vhs"), b"cached").unwrap();
    cache.store(&staged, "vhs", "0.7.1").unwrap();

    // Unreachable URL: a hit must return before any connection attempt.
    let plan = AcquirePlan::archive(
        "vhs",
        "0.7.1",
        "http://127.0.0.1:1/vhs_0.7.1_Linux_x86_64.tar.gz",
        "vhs_0.7.1_Linux_x86_64.tar.gz",
    );
    let client = reqwest::Client::new();
    let dir = acquire(&plan, &cache, &client, None).await.unwrap();
    assert_eq!(std::fs::read(dir.join("vhs")).unwrap(), b"cached");
}

#[tokio::test]
async fn nested_font_archive_subtree_resolves_through_the_asset_stem() {
    let temp = TempDir::new().unwrap();

    // DejaVu-style layout: content nested under the archive's own stem.
    let archive = temp.path().join("dejavu-fonts-ttf-2.37.zip");
    make_zip(
        &archive,
        &[
            ("dejavu-fonts-ttf-2.37/ttf/DejaVuSansMono.ttf", b"font"),
            ("dejavu-fonts-ttf-2.37/AUTHORS", b"authors"),
        ],
    );

    let extracted = temp.path().join("extracted");
    extract(&archive, &extracted, ArchiveKind::Zip, 0)
        .await
        .unwrap();

    // The derived-stem segment resolves to the nested directory.
    let subtree = extracted
        .join(asset_stem("dejavu-fonts-ttf-2.37.zip"))
        .join("ttf");
    assert!(subtree.is_dir());
    assert_eq!(
        std::fs::read(subtree.join("DejaVuSansMono.ttf")).unwrap(),
        b"font"
    );
}
