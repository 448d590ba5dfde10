//! Archive extraction.
//!
//! Extraction always targets a staging directory owned by the caller; the
//! cache is only written by the publish step afterwards, so a failed
//! extraction never leaves a partial entry behind.

use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use vhs_action_core::{Error, Result};
use xz2::read::XzDecoder;

/// Container/compression format of a downloaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// gzip-compressed tarball.
    TarGz,
    /// xz-compressed tarball.
    TarXz,
    /// Zip archive.
    Zip,
    /// 7-Zip archive, extracted via the external `7z` executable.
    SevenZip,
    /// Not an archive; the payload is the file itself.
    None,
}

impl ArchiveKind {
    /// Detect the archive kind from a file name. Unrecognized extensions are
    /// treated as raw files.
    #[must_use]
    pub fn detect(name: &str) -> Self {
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Self::TarGz
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Self::TarXz
        } else if name.ends_with(".zip") {
            Self::Zip
        } else if name.ends_with(".7z") {
            Self::SevenZip
        } else {
            Self::None
        }
    }

    /// The extension this kind strips from an asset file name.
    #[must_use]
    pub fn extension(self) -> &'static [&'static str] {
        match self {
            Self::TarGz => &[".tar.gz", ".tgz"],
            Self::TarXz => &[".tar.xz", ".txz"],
            Self::Zip => &[".zip"],
            Self::SevenZip => &[".7z"],
            Self::None => &[],
        }
    }
}

/// The asset's file name minus its archive extension.
///
/// Several hosting repositories nest archive content inside a directory of
/// this name; path templates reference it as a derived segment.
#[must_use]
pub fn asset_stem(name: &str) -> String {
    for ext in [".tar.gz", ".tgz", ".tar.xz", ".txz", ".zip", ".7z"] {
        if let Some(stem) = name.strip_suffix(ext) {
            return stem.to_string();
        }
    }
    name.to_string()
}

/// Extract `archive` into `dest`, dropping `strip_components` leading path
/// components from every entry.
///
/// # Errors
///
/// Returns [`Error::Extraction`] when the archive is malformed, and IO
/// errors for write failures.
pub async fn extract(
    archive: &Path,
    dest: &Path,
    kind: ArchiveKind,
    strip_components: usize,
) -> Result<()> {
    debug!(?archive, ?dest, ?kind, strip_components, "Extracting");
    std::fs::create_dir_all(dest)?;

    match kind {
        ArchiveKind::TarGz => {
            let file = std::fs::File::open(archive)?;
            extract_tar(GzDecoder::new(file), archive, dest, strip_components)
        }
        ArchiveKind::TarXz => {
            let file = std::fs::File::open(archive)?;
            extract_tar(XzDecoder::new(file), archive, dest, strip_components)
        }
        ArchiveKind::Zip => extract_zip(archive, dest, strip_components),
        ArchiveKind::SevenZip => extract_7z(archive, dest, strip_components).await,
        ArchiveKind::None => Err(Error::extraction(
            archive.display().to_string(),
            "not an archive",
        )),
    }
}

fn extract_tar<R: Read>(
    reader: R,
    archive: &Path,
    dest: &Path,
    strip_components: usize,
) -> Result<()> {
    let archive_name = archive.display().to_string();
    let mut tar = tar::Archive::new(reader);

    for entry in tar
        .entries()
        .map_err(|e| Error::extraction(&archive_name, e.to_string()))?
    {
        let mut entry = entry.map_err(|e| Error::extraction(&archive_name, e.to_string()))?;
        let path = entry
            .path()
            .map_err(|e| Error::extraction(&archive_name, e.to_string()))?
            .into_owned();

        let Some(stripped) = strip_path(&path, strip_components) else {
            continue;
        };
        let out = dest.join(stripped);
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry
            .unpack(&out)
            .map_err(|e| Error::extraction(&archive_name, e.to_string()))?;
    }
    Ok(())
}

fn extract_zip(archive: &Path, dest: &Path, strip_components: usize) -> Result<()> {
    let archive_name = archive.display().to_string();
    let file = std::fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| Error::extraction(&archive_name, e.to_string()))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| Error::extraction(&archive_name, e.to_string()))?;

        let Some(path) = entry.enclosed_name() else {
            continue;
        };
        let Some(stripped) = strip_path(&path, strip_components) else {
            continue;
        };
        let out = dest.join(stripped);

        if entry.is_dir() {
            std::fs::create_dir_all(&out)?;
        } else {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut outfile = std::fs::File::create(&out)?;
            std::io::copy(&mut entry, &mut outfile)?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&out, std::fs::Permissions::from_mode(mode))?;
            }
        }
    }
    Ok(())
}

/// 7z has no pure-Rust story worth carrying for one Windows-only archive;
/// the runner images ship a `7z` executable, so it is driven as an external
/// process like the package managers are.
async fn extract_7z(archive: &Path, dest: &Path, strip_components: usize) -> Result<()> {
    let status = tokio::process::Command::new("7z")
        .arg("x")
        .arg(archive)
        .arg(format!("-o{}", dest.display()))
        .arg("-y")
        .status()
        .await?;

    if !status.success() {
        return Err(Error::CommandFailed {
            program: "7z".into(),
            status: status.code().unwrap_or(-1),
        });
    }

    // 7z cannot strip leading components itself; hoist single-directory
    // levels after the fact.
    for _ in 0..strip_components {
        hoist_single_root(dest)?;
    }
    Ok(())
}

/// If `dir` contains exactly one entry and it is a directory, move that
/// directory's children up into `dir`.
fn hoist_single_root(dir: &Path) -> Result<()> {
    let entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    if entries.len() != 1 || !entries[0].file_type()?.is_dir() {
        return Ok(());
    }
    let root = entries[0].path();
    for child in std::fs::read_dir(&root)? {
        let child = child?;
        std::fs::rename(child.path(), dir.join(child.file_name()))?;
    }
    std::fs::remove_dir(&root)?;
    Ok(())
}

/// Drop `n` leading components; `None` when nothing remains.
fn strip_path(path: &Path, n: usize) -> Option<PathBuf> {
    let stripped: PathBuf = path.components().skip(n).collect();
    if stripped.as_os_str().is_empty() {
        None
    } else {
        Some(stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

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

    #[test]
    fn test_detect() {
        assert_eq!(ArchiveKind::detect("vhs_0.7.1_Linux_x86_64.tar.gz"), ArchiveKind::TarGz);
        assert_eq!(ArchiveKind::detect("ffmpeg-release-amd64-static.tar.xz"), ArchiveKind::TarXz);
        assert_eq!(ArchiveKind::detect("JetBrainsMono-2.304.zip"), ArchiveKind::Zip);
        assert_eq!(ArchiveKind::detect("ffmpeg-release-full.7z"), ArchiveKind::SevenZip);
        assert_eq!(ArchiveKind::detect("ttyd.x86_64"), ArchiveKind::None);
    }

    #[test]
    fn test_asset_stem() {
        assert_eq!(asset_stem("dejavu-fonts-ttf-2.37.zip"), "dejavu-fonts-ttf-2.37");
        assert_eq!(asset_stem("liberation-fonts-ttf-2.1.5.tar.gz"), "liberation-fonts-ttf-2.1.5");
        assert_eq!(asset_stem("ttyd.x86_64"), "ttyd.x86_64");
    }

    #[tokio::test]
    async fn test_extract_tar_gz() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.tar.gz");
        make_tar_gz(&archive, &[("vhs", b"binary"), ("docs/readme", b"hello")]);

        let dest = temp.path().join("out");
        extract(&archive, &dest, ArchiveKind::TarGz, 0).await.unwrap();

        assert_eq!(std::fs::read(dest.join("vhs")).unwrap(), b"binary");
        assert_eq!(std::fs::read(dest.join("docs/readme")).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_extract_tar_gz_strips_version_root() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.tar.gz");
        make_tar_gz(
            &archive,
            &[
                ("ffmpeg-6.0-amd64-static/ffmpeg", b"ff"),
                ("ffmpeg-6.0-amd64-static/model/x", b"m"),
            ],
        );

        let dest = temp.path().join("out");
        extract(&archive, &dest, ArchiveKind::TarGz, 1).await.unwrap();

        assert_eq!(std::fs::read(dest.join("ffmpeg")).unwrap(), b"ff");
        assert_eq!(std::fs::read(dest.join("model/x")).unwrap(), b"m");
        assert!(!dest.join("ffmpeg-6.0-amd64-static").exists());
    }

    #[tokio::test]
    async fn test_extract_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.zip");
        make_zip(&archive, &[("ttf/FiraCode-Regular.ttf", b"font"), ("readme.md", b"r")]);

        let dest = temp.path().join("out");
        extract(&archive, &dest, ArchiveKind::Zip, 0).await.unwrap();

        assert_eq!(std::fs::read(dest.join("ttf/FiraCode-Regular.ttf")).unwrap(), b"font");
    }

    #[tokio::test]
    async fn test_extract_zip_with_strip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.zip");
        make_zip(&archive, &[("root-1.0/ttf/a.ttf", b"font")]);

        let dest = temp.path().join("out");
        extract(&archive, &dest, ArchiveKind::Zip, 1).await.unwrap();

        assert_eq!(std::fs::read(dest.join("ttf/a.ttf")).unwrap(), b"font");
    }

    #[tokio::test]
    async fn test_extract_rejects_raw_files() {
        let temp = TempDir::new().unwrap();
        let raw = temp.path().join("ttyd.x86_64");
        std::fs::write(&raw, b"elf").unwrap();

        let err = extract(&raw, &temp.path().join("out"), ArchiveKind::None, 0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not an archive"));
    }

    #[test]
    fn test_strip_path() {
        assert_eq!(
            strip_path(Path::new("a/b/c"), 1),
            Some(PathBuf::from("b/c"))
        );
        assert_eq!(strip_path(Path::new("a"), 1), None);
        assert_eq!(strip_path(Path::new("a/b"), 0), Some(PathBuf::from("a/b")));
    }

    #[test]
    fn test_hoist_single_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ffmpeg-full_build");
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::write(root.join("bin/ffmpeg.exe"), b"ff").unwrap();

        hoist_single_root(temp.path()).unwrap();
        assert!(temp.path().join("bin/ffmpeg.exe").exists());
        assert!(!temp.path().join("ffmpeg-full_build").exists());
    }
}
