use std::fs;
use std::path::{Path, PathBuf};

use jpeg_meta::config::Config;
use jpeg_meta::exif::{MetaData, Tag};
use jpeg_meta::pipeline::{check_image, collect_images, process_image, write_file};

/// APP0/JFIF, an old EXIF APP1, DQT, SOF0, SOS with a little scan data, EOI.
fn sample_jpeg() -> Vec<u8> {
    let mut v = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    v.extend_from_slice(b"JFIF\0\x01\x01\x00\x00\x01\x00\x01\x00\x00");
    v.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x12]);
    v.extend_from_slice(b"Exif\0\0MM\0*\0\0\0\x08\0\0");
    v.extend(image_data());
    v
}

fn image_data() -> Vec<u8> {
    let mut v = vec![0xFF, 0xDB, 0x00, 0x43, 0x00];
    v.extend([1u8; 64]);
    v.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x10, 0x00, 0x10, 0x01, 0x01, 0x11, 0x00]);
    v.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    v.extend_from_slice(&[0xF8, 0x7F, 0xFF, 0x00, 0x01]);
    v.extend_from_slice(&[0xFF, 0xD9]);
    v
}

fn write_sample(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, sample_jpeg()).unwrap();
    path
}

fn no_backup() -> Config {
    let mut config = Config::default();
    config.output.backup_originals = false;
    config
}

#[test]
fn writes_into_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "a.jpg");
    let out_dir = dir.path().join("out");

    let md = MetaData::from([(Tag::Artist, "Jane Doe".to_string())]);
    let result = process_image(&src, &md, &no_backup(), Some(out_dir.as_path()));
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(result.output_path, out_dir.join("a.jpg"));
    assert_eq!(result.tags_written, vec![Tag::Artist]);

    let out = fs::read(&result.output_path).unwrap();
    assert_eq!(out.len() as u64, result.bytes_written);
    assert_eq!(&out[0..4], &[0xFF, 0xD8, 0xFF, 0xE1]);
    assert!(out.ends_with(&image_data()));

    // Source untouched.
    assert_eq!(fs::read(&src).unwrap(), sample_jpeg());
}

#[test]
fn rewrites_in_place_with_backup() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "b.jpeg");

    let md = MetaData::from([(Tag::Copyright, "CC-BY 4.0".to_string())]);
    let result = process_image(&src, &md, &Config::default(), None);
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(result.output_path, src);

    let backup = result.backup_path.expect("backup made");
    assert_eq!(backup, dir.path().join("b.jpeg.bak"));
    assert_eq!(fs::read(&backup).unwrap(), sample_jpeg());

    let out = fs::read(&src).unwrap();
    assert!(out.ends_with(&image_data()));
    assert_ne!(out, sample_jpeg());

    // No temporary file left behind.
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn strips_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "c.jpg");

    let result = process_image(&src, &MetaData::new(), &no_backup(), None);
    assert!(result.error.is_none(), "{:?}", result.error);
    assert!(result.tags_written.is_empty());

    let mut expected = vec![0xFF, 0xD8];
    expected.extend(image_data());
    assert_eq!(fs::read(&src).unwrap(), expected);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "d.jpg");

    let mut config = Config::default();
    config.output.dry_run = true;
    let md = MetaData::from([(Tag::Title, "Harbour".to_string())]);
    let result = process_image(&src, &md, &config, None);

    assert!(result.error.is_none(), "{:?}", result.error);
    assert!(result.bytes_written > 0);
    assert_eq!(fs::read(&src).unwrap(), sample_jpeg());
    assert!(!dir.path().join("d.jpg.bak").exists());
}

#[test]
fn suffix_writes_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "e.jpg");

    let mut config = no_backup();
    config.output.suffix = Some("-tagged".into());
    let md = MetaData::from([(Tag::Artist, "Jane".to_string())]);
    let result = process_image(&src, &md, &config, None);

    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(result.output_path, dir.path().join("e-tagged.jpg"));
    assert!(result.output_path.exists());
    assert_eq!(fs::read(&src).unwrap(), sample_jpeg());
}

#[test]
fn capacity_error_leaves_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "f.jpg");

    let md = MetaData::from([(Tag::Artist, "x".repeat(70_000))]);
    let result = process_image(&src, &md, &no_backup(), None);

    let err = result.error.expect("too long");
    assert!(err.contains("too long"), "{err}");
    assert!(result.tags_written.is_empty());
    assert_eq!(fs::read(&src).unwrap(), sample_jpeg());
}

#[test]
fn invalid_jpeg_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.jpg");
    fs::write(&path, b"\x89PNG\r\n\x1a\n").unwrap();

    let result = process_image(&path, &MetaData::new(), &no_backup(), None);
    let err = result.error.expect("invalid");
    assert!(err.contains("missing SOI marker"), "{err}");

    assert!(check_image(&path).is_err());
}

#[test]
fn check_reports_dqt_offset() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "g.jpg");
    // SOI + APP0 (18) + APP1 (20)
    assert_eq!(check_image(&src).unwrap(), 2 + 18 + 20);
}

#[test]
fn collects_only_jpegs() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path(), "one.jpg");
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_sample(&dir.path().join("nested"), "two.JPEG");
    fs::write(dir.path().join("notes.txt"), "hi").unwrap();

    let images = collect_images(&[dir.path().to_path_buf()]);
    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|p| p.extension().is_some()));
}

#[test]
fn write_file_counts_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.bin");
    let n = write_file(&path, &b"hello world"[..]).unwrap();
    assert_eq!(n, 11);
    assert_eq!(fs::read(&path).unwrap(), b"hello world");
}

#[test]
fn output_dir_equal_to_source_dir_rewrites_safely() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "h.jpg");

    let md = MetaData::from([(Tag::Artist, "Jane".to_string())]);
    let result = process_image(&src, &md, &no_backup(), src.parent());
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(result.output_path, src);

    let out = fs::read(&src).unwrap();
    assert_eq!(out.len() as u64, result.bytes_written);
    assert_eq!(&out[0..4], &[0xFF, 0xD8, 0xFF, 0xE1]);
    assert!(out.ends_with(&image_data()));
    assert!(out.len() < sample_jpeg().len() + 100);
}

#[test]
fn output_dir_spelled_differently_still_detected() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "i.jpg");
    let same_dir = dir.path().join(".");

    let md = MetaData::from([(Tag::Title, "Harbour".to_string())]);
    let result = process_image(&src, &md, &no_backup(), Some(same_dir.as_path()));
    assert!(result.error.is_none(), "{:?}", result.error);
    assert!(fs::read(&src).unwrap().ends_with(&image_data()));
}

#[test]
fn failed_backup_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_sample(dir.path(), "j.jpg");
    // A directory where the backup should go makes the copy fail.
    fs::create_dir(dir.path().join("j.jpg.bak")).unwrap();

    let md = MetaData::from([(Tag::Artist, "Jane".to_string())]);
    let result = process_image(&src, &md, &Config::default(), None);

    let err = result.error.expect("backup should fail");
    assert!(err.contains("backup"), "{err}");
    assert_eq!(fs::read(&src).unwrap(), sample_jpeg());
    assert!(!dir.path().join(".j.jpg.jpeg-meta.tmp").exists());
}
