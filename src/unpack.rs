//! Extraction of archives collected in the `archives` folder.
//!
//! Every archive directly inside the folder is unpacked into a sibling
//! directory named after the archive's base name (`pack.zip` -> `pack/`).
//! An existing directory of that name means the archive was handled before,
//! so it is skipped. Archives themselves are never deleted.
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_category::{Category, FileMapper};
use crate::normalizer::is_taken;
use crate::scanner::ensure_dir;
use flate2::read::GzDecoder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Size of one tar header block.
const TAR_HEADER_LEN: usize = 512;

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    Gzip,
}

impl ArchiveFormat {
    /// Format implied by a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "zip" => Some(Self::Zip),
            "tar" => Some(Self::Tar),
            "gz" => Some(Self::Gzip),
            _ => None,
        }
    }

    /// Format implied by a sniffed MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/zip" => Some(Self::Zip),
            "application/x-tar" => Some(Self::Tar),
            "application/gzip" => Some(Self::Gzip),
            _ => None,
        }
    }

    /// Detects the format of `path`, trusting content over the extension.
    ///
    /// Content sniffed as a supported container wins. Anything else is handed to
    /// the decoder the extension names, which fails with `UnpackFailed` when the
    /// bytes are not that format.
    pub fn detect(path: &Path, ext: &str) -> OrganizeResult<Option<Self>> {
        let sniffed = infer::get_from_path(path).map_err(|e| OrganizeError::from_io(path, e))?;
        if let Some(kind) = sniffed
            && let Some(format) = Self::from_mime(kind.mime_type())
        {
            return Ok(Some(format));
        }
        Ok(Self::from_extension(ext))
    }
}

/// One archive that was unpacked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedArchive {
    pub archive: PathBuf,
    pub into: PathBuf,
}

/// What the unpack phase did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnpackReport {
    pub extracted: Vec<ExtractedArchive>,
    /// Archives whose extraction directory already existed.
    pub skipped: Vec<PathBuf>,
}

/// Unpacks every archive directly inside `archives_dir`.
///
/// Stops at the first failure; archives extracted before it stay extracted.
///
/// # Errors
///
/// * [`OrganizeError::NotFound`] if `archives_dir` does not exist
/// * [`OrganizeError::UnpackFailed`] for corrupt or unsupported archives
/// * [`OrganizeError::PermissionDenied`] if the target cannot be written
pub fn unpack_archives(archives_dir: &Path) -> OrganizeResult<UnpackReport> {
    ensure_dir(archives_dir)?;

    let mapper = FileMapper::default();
    let mut archives = Vec::new();
    let entries = fs::read_dir(archives_dir).map_err(|e| OrganizeError::from_io(archives_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| OrganizeError::from_io(archives_dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if mapper.categorize_path(&path) == Category::Archives {
            archives.push(path);
        } else {
            debug!(path = %path.display(), "not an archive, leaving in place");
        }
    }
    archives.sort();

    let mut report = UnpackReport::default();
    for archive in archives {
        match unpack_one(&archive)? {
            Some(into) => report.extracted.push(ExtractedArchive { archive, into }),
            None => report.skipped.push(archive),
        }
    }
    Ok(report)
}

/// Unpacks one archive next to itself. Returns `None` if it was already unpacked.
pub fn unpack_one(archive: &Path) -> OrganizeResult<Option<PathBuf>> {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some((base, ext)) = name.rsplit_once('.') else {
        return Err(OrganizeError::UnpackFailed {
            archive: archive.to_path_buf(),
            reason: "file name has no extension".to_string(),
        });
    };
    let parent = archive.parent().unwrap_or_else(|| Path::new("."));
    let target = parent.join(base);

    if is_taken(&target) {
        if target.is_dir() {
            debug!(archive = %archive.display(), "already unpacked, skipping");
            return Ok(None);
        }
        return Err(OrganizeError::AlreadyExists { path: target });
    }

    let format = ArchiveFormat::detect(archive, ext)?.ok_or_else(|| OrganizeError::UnpackFailed {
        archive: archive.to_path_buf(),
        reason: format!("unsupported archive format '.{ext}'"),
    })?;

    fs::create_dir_all(&target).map_err(|e| OrganizeError::from_io(&target, e))?;

    if let Err(e) = extract(archive, &target, format, base) {
        if let Err(rm) = fs::remove_dir_all(&target) {
            warn!(path = %target.display(), error = %rm, "could not remove partial extraction");
        }
        return Err(e);
    }

    info!(archive = %archive.display(), into = %target.display(), ?format, "unpacked archive");
    Ok(Some(target))
}

fn extract(archive: &Path, target: &Path, format: ArchiveFormat, base: &str) -> OrganizeResult<()> {
    let file = File::open(archive).map_err(|e| OrganizeError::from_io(archive, e))?;
    let reader = BufReader::new(file);

    match format {
        ArchiveFormat::Zip => {
            let mut zip = zip::ZipArchive::new(reader).map_err(|e| zip_error(archive, target, e))?;
            zip.extract(target).map_err(|e| zip_error(archive, target, e))
        }
        ArchiveFormat::Tar => tar::Archive::new(reader)
            .unpack(target)
            .map_err(|e| io_unpack_error(archive, target, e)),
        ArchiveFormat::Gzip => {
            let mut decoder = GzDecoder::new(reader);
            let mut head = Vec::with_capacity(TAR_HEADER_LEN);
            (&mut decoder)
                .take(TAR_HEADER_LEN as u64)
                .read_to_end(&mut head)
                .map_err(|e| io_unpack_error(archive, target, e))?;
            // Moved names lose the inner dot (`x.tar.gz` -> `x_tar.gz`), so
            // tarballs are recognised by their header.
            let is_tarball = infer::archive::is_tar(&head);
            let mut stream = io::Cursor::new(head).chain(decoder);

            if is_tarball {
                return tar::Archive::new(stream)
                    .unpack(target)
                    .map_err(|e| io_unpack_error(archive, target, e));
            }

            let out_path = target.join(base);
            let mut out = File::create(&out_path).map_err(|e| OrganizeError::from_io(&out_path, e))?;
            io::copy(&mut stream, &mut out)
                .map(|_| ())
                .map_err(|e| io_unpack_error(archive, target, e))
        }
    }
}

fn io_unpack_error(archive: &Path, target: &Path, e: io::Error) -> OrganizeError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        OrganizeError::PermissionDenied {
            path: target.to_path_buf(),
        }
    } else {
        OrganizeError::UnpackFailed {
            archive: archive.to_path_buf(),
            reason: e.to_string(),
        }
    }
}

fn zip_error(archive: &Path, target: &Path, e: zip::result::ZipError) -> OrganizeError {
    match e {
        zip::result::ZipError::Io(io) => io_unpack_error(archive, target, io),
        other => OrganizeError::UnpackFailed {
            archive: archive.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, body) in entries {
            zip.start_file(*name, zip::write::FileOptions::default())
                .unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn tar_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, body) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, body.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_unpack_zip() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        write_zip(&dir.join("pack.zip"), &[("hello.txt", "hi"), ("sub/deep.txt", "deep")]);

        let report = unpack_archives(dir).unwrap();

        assert_eq!(report.extracted.len(), 1);
        assert_eq!(report.extracted[0].into, dir.join("pack"));
        assert_eq!(fs::read_to_string(dir.join("pack/hello.txt")).unwrap(), "hi");
        assert_eq!(fs::read_to_string(dir.join("pack/sub/deep.txt")).unwrap(), "deep");
        assert!(dir.join("pack.zip").exists());
    }

    #[test]
    fn test_unpack_tar_and_tar_gz() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("plain.tar"), tar_bytes(&[("a.txt", "a")])).unwrap();
        fs::write(dir.join("bundle.tar.gz"), gzip(&tar_bytes(&[("b.txt", "b")]))).unwrap();

        let report = unpack_archives(dir).unwrap();

        assert_eq!(report.extracted.len(), 2);
        assert_eq!(fs::read_to_string(dir.join("plain/a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dir.join("bundle.tar/b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_gzipped_tar_is_untarred_whatever_its_name() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("bundle_tar.gz"), gzip(&tar_bytes(&[("b.txt", "b")]))).unwrap();

        unpack_archives(dir).unwrap();

        assert_eq!(fs::read_to_string(dir.join("bundle_tar/b.txt")).unwrap(), "b");
        assert!(!dir.join("bundle_tar/bundle_tar").exists());
    }

    #[test]
    fn test_unpack_single_gzip_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("notes.txt.gz"), gzip(b"remember")).unwrap();

        unpack_archives(dir).unwrap();
        assert_eq!(
            fs::read_to_string(dir.join("notes.txt/notes.txt")).unwrap(),
            "remember"
        );
    }

    #[test]
    fn test_unpack_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        write_zip(&dir.join("pack.zip"), &[("hello.txt", "hi")]);

        let first = unpack_archives(dir).unwrap();
        assert_eq!(first.extracted.len(), 1);

        fs::write(dir.join("pack/hello.txt"), "edited").unwrap();
        let second = unpack_archives(dir).unwrap();
        assert!(second.extracted.is_empty());
        assert_eq!(second.skipped, vec![dir.join("pack.zip")]);
        assert_eq!(fs::read_to_string(dir.join("pack/hello.txt")).unwrap(), "edited");
    }

    #[test]
    fn test_corrupt_archive_fails_and_keeps_source() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("broken.zip"), b"definitely not a zip").unwrap();

        let err = unpack_archives(dir).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnpackFailed);
        assert!(dir.join("broken.zip").exists());
        assert!(!dir.join("broken").exists());
    }

    #[test]
    fn test_mislabelled_archive_is_detected_by_content() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        write_zip(&dir.join("actually_zip.gz"), &[("inside.txt", "zip")]);

        unpack_archives(dir).unwrap();
        assert_eq!(
            fs::read_to_string(dir.join("actually_zip/inside.txt")).unwrap(),
            "zip"
        );
    }

    #[test]
    fn test_non_archives_and_subdirectories_are_ignored() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("readme.txt"), b"text").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        write_zip(&dir.join("nested/inner.zip"), &[("x.txt", "x")]);

        let report = unpack_archives(dir).unwrap();
        assert!(report.extracted.is_empty());
        assert!(!dir.join("nested/inner").exists());
    }

    #[test]
    fn test_missing_archives_dir_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = unpack_archives(&temp.path().join("archives")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_format_lookup() {
        assert_eq!(ArchiveFormat::from_extension("ZIP"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_extension("gz"), Some(ArchiveFormat::Gzip));
        assert_eq!(ArchiveFormat::from_extension("rar"), None);
        assert_eq!(
            ArchiveFormat::from_mime("application/x-tar"),
            Some(ArchiveFormat::Tar)
        );
    }
}
