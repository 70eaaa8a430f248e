use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::exif::{self, MetaData, Tag};
use crate::jpeg;

/// Supported image extensions.
const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg", "jpe", "jfif"];

/// Extension appended to output names that don't already carry one.
const DEFAULT_EXTENSION: &str = "jpg";

/// The result of processing a single image.
///
/// # Example
///
/// ```rust,no_run
/// # use jpeg_meta::pipeline::process_image;
/// # use jpeg_meta::config::Config;
/// # use jpeg_meta::exif::{MetaData, Tag};
/// let md = MetaData::from([(Tag::Artist, "Jane Doe".to_string())]);
/// let result = process_image("photo.jpg".as_ref(), &md, &Config::default(), None);
///
/// if result.error.is_none() {
///     println!("Wrote {} bytes to {}", result.bytes_written, result.output_path.display());
/// }
/// ```
#[derive(Debug)]
pub struct ProcessResult {
    pub path: PathBuf,
    /// Where the output went (or would go, in a dry run).
    pub output_path: PathBuf,
    /// Tags written, in on-disk order. Empty when metadata was stripped.
    pub tags_written: Vec<Tag>,
    pub bytes_written: u64,
    /// Backup of the original, if one was made.
    pub backup_path: Option<PathBuf>,
    pub dry_run: bool,
    pub error: Option<String>,
}

/// Collect JPEG files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks). Only files with a JPEG extension are
/// included.
///
/// # Example
///
/// ```rust,no_run
/// use jpeg_meta::pipeline::collect_images;
/// use std::path::PathBuf;
///
/// let images = collect_images(&[
///     PathBuf::from("photo.jpg"),       // single file
///     PathBuf::from("./photos/"),        // entire directory
/// ]);
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_jpeg_path(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_jpeg_path(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Check if a file has a JPEG extension.
pub fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| JPEG_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Make sure an output name ends in a JPEG extension, appending `.jpg` if not.
pub fn normalize_output_path(path: &Path) -> PathBuf {
    if is_jpeg_path(path) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(DEFAULT_EXTENSION);
    PathBuf::from(name)
}

/// Decide where the processed copy of `path` goes.
///
/// `out_dir` wins over the configured suffix; with neither, the image is
/// rewritten in place and `None` is returned.
pub fn output_path_for(path: &Path, out_dir: Option<&Path>, suffix: Option<&str>) -> Option<PathBuf> {
    let file_name = path.file_name()?;

    if let Some(dir) = out_dir {
        return Some(normalize_output_path(&dir.join(file_name)));
    }

    let suffix = suffix.filter(|s| !s.is_empty())?;
    let stem = path.file_stem()?.to_string_lossy();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    Some(normalize_output_path(
        &path.with_file_name(format!("{stem}{suffix}.{ext}")),
    ))
}

/// Drain `r` into a new file at `path`, returning the number of bytes written.
///
/// The file is created (or truncated) at the absolute form of `path`.
pub fn write_file<R: Read>(path: &Path, mut r: R) -> Result<u64> {
    let path = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;

    let mut file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let n = io::copy(&mut r, &mut file)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    log::debug!("Wrote {n} bytes to {}", path.display());
    Ok(n)
}

/// Create a backup of the original file.
fn backup_file(path: &Path) -> Result<PathBuf> {
    let backup_path = path.with_extension(format!(
        "{}.bak",
        path.extension().unwrap_or_default().to_string_lossy()
    ));

    // An earlier backup is the true original; keep it.
    if backup_path.is_file() {
        log::debug!("Keeping existing backup: {}", backup_path.display());
        return Ok(backup_path);
    }

    std::fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to create backup {}", backup_path.display()))?;
    log::debug!("Backup created: {}", backup_path.display());
    Ok(backup_path)
}

/// Sibling path used while rewriting a file in place.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.jpeg-meta.tmp"))
}

/// Whether `output` names the same file as `source`.
///
/// `output` may not exist yet, so its parent is resolved instead and the file
/// name joined back on.
fn is_same_file(source: &Path, output: &Path) -> bool {
    let Ok(source) = std::fs::canonicalize(source) else {
        return false;
    };
    let Some(name) = output.file_name() else {
        return false;
    };
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::canonicalize(parent)
        .map(|dir| dir.join(name) == source)
        .unwrap_or(false)
}

/// Validate a JPEG and locate its DQT marker without writing anything.
///
/// Returns the byte offset of the DQT marker.
pub fn check_image(path: &Path) -> Result<u64> {
    let mut file = File::open(path).context("Failed to open image file")?;
    jpeg::assert_jpeg(&mut file).context("Not a valid JPEG")?;
    let offset = jpeg::seek_to_dqt(&mut file).context("Failed to locate DQT marker")?;
    Ok(offset)
}

/// Replace (or, with an empty `md`, strip) the metadata of one image.
///
/// Writes to `out_dir` or to a suffixed sibling when configured, otherwise
/// rewrites the image in place: output goes to a temporary sibling first and
/// is renamed over the original once complete, so the source is never
/// truncated while it is still being read. An output path that resolves to
/// the source itself (say `-o` naming the image's own directory) is handled
/// the same way.
///
/// # Example
///
/// ```rust,no_run
/// use jpeg_meta::config::Config;
/// use jpeg_meta::exif::MetaData;
/// use jpeg_meta::pipeline::process_image;
///
/// // Strip all metadata, writing the result into ./clean/
/// let result = process_image(
///     "photo.jpg".as_ref(),
///     &MetaData::new(),
///     &Config::default(),
///     Some("clean".as_ref()),
/// );
/// assert!(result.tags_written.is_empty());
/// ```
pub fn process_image(path: &Path, md: &MetaData, config: &Config, out_dir: Option<&Path>) -> ProcessResult {
    let output_path = output_path_for(path, out_dir, config.output.suffix.as_deref())
        .filter(|out| {
            let same = is_same_file(path, out);
            if same {
                log::debug!("Output is the source itself, rewriting in place: {}", out.display());
            }
            !same
        });
    let in_place = output_path.is_none();

    let mut tags_written: Vec<Tag> = md.keys().copied().collect();
    tags_written.sort_by_key(|t| t.id());

    let mut result = ProcessResult {
        path: path.to_path_buf(),
        output_path: output_path.clone().unwrap_or_else(|| path.to_path_buf()),
        tags_written,
        bytes_written: 0,
        backup_path: None,
        dry_run: config.output.dry_run,
        error: None,
    };

    let outcome = if config.output.dry_run {
        encode_to_sink(path, md)
    } else if in_place {
        rewrite_in_place(path, md, config.output.backup_originals).map(|(n, backup)| {
            result.backup_path = backup;
            n
        })
    } else {
        encode_to_file(path, &result.output_path, md)
    };

    match outcome {
        Ok(n) => result.bytes_written = n,
        Err(e) => {
            result.tags_written.clear();
            result.error = Some(format!("{e:#}"));
        }
    }

    result
}

/// Run the full encode but discard the output.
fn encode_to_sink(path: &Path, md: &MetaData) -> Result<u64> {
    let mut file = File::open(path).context("Failed to open image file")?;
    let mut reader = exif::set_meta(&mut file, md).context("Failed to encode metadata")?;
    io::copy(&mut reader, &mut io::sink()).context("Failed to read image data")
}

fn encode_to_file(path: &Path, output: &Path, md: &MetaData) -> Result<u64> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let mut file = File::open(path).context("Failed to open image file")?;
    let reader = exif::set_meta(&mut file, md).context("Failed to encode metadata")?;
    write_file(output, reader)
}

fn rewrite_in_place(path: &Path, md: &MetaData, backup: bool) -> Result<(u64, Option<PathBuf>)> {
    let tmp = temp_path_for(path);

    let written = encode_to_file(path, &tmp, md);
    let n = match written {
        Ok(n) => n,
        Err(e) => {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
    };

    let finish = || -> Result<Option<PathBuf>> {
        let backup_path = if backup { Some(backup_file(path)?) } else { None };
        std::fs::rename(&tmp, path).context("Failed to replace original image")?;
        Ok(backup_path)
    };

    match finish() {
        Ok(backup_path) => Ok((n, backup_path)),
        Err(e) => {
            let _ = std::fs::remove_file(&tmp);
            Err(e)
        }
    }
}
