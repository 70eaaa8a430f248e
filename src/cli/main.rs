use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use jpeg_meta::exif::{self, MetaData, Tag};
use jpeg_meta::{config, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "jpeg-meta",
    version,
    about = "Byte-exact JPEG metadata editor — replace or strip EXIF without re-encoding"
)]
struct Cli {
    /// JPEG files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Artist (0x013B)
    #[arg(long)]
    artist: Option<String>,

    /// Title, written as ImageDescription (0x010E)
    #[arg(long)]
    title: Option<String>,

    /// Copyright (0x8298)
    #[arg(long)]
    copyright: Option<String>,

    /// Any supported tag as NAME=VALUE (repeatable), e.g. --tag model=X100V
    #[arg(long = "tag", value_name = "NAME=VALUE", value_parser = exif::parse_tag_assignment)]
    tags: Vec<(Tag, String)>,

    /// Remove all metadata instead of writing tags
    #[arg(long, conflicts_with_all = ["artist", "title", "copyright", "tags"])]
    strip: bool,

    /// Only validate the image(s) and locate the DQT marker
    #[arg(long)]
    check: bool,

    /// Display the IFD0 string tags of the image(s) and exit
    #[arg(long)]
    show: bool,

    /// Write results into this directory instead of modifying files in place
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Preview changes without writing to files
    #[arg(long)]
    dry_run: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Tag values given on the command line.
    fn metadata(&self) -> MetaData {
        let mut md = MetaData::new();
        if let Some(ref v) = self.artist {
            md.insert(Tag::Artist, v.clone());
        }
        if let Some(ref v) = self.title {
            md.insert(Tag::Title, v.clone());
        }
        if let Some(ref v) = self.copyright {
            md.insert(Tag::Copyright, v.clone());
        }
        for (tag, value) in &self.tags {
            md.insert(*tag, value.clone());
        }
        md
    }

    /// The tag set to write: config defaults under the command-line values,
    /// or nothing with `--strip`. Refuses an empty set without `--strip`, so
    /// metadata is never removed by accident.
    fn select_metadata(&self, config: &config::Config) -> Result<MetaData> {
        if self.strip {
            return Ok(MetaData::new());
        }
        let md = config.merged_metadata(&self.metadata());
        if md.is_empty() {
            anyhow::bail!("No tags given; use --strip to remove metadata");
        }
        Ok(md)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    let images = pipeline::collect_images(&cli.paths);
    if images.is_empty() {
        anyhow::bail!("No JPEG files found in the specified paths.");
    }

    // Handle --show
    if cli.show {
        for image_path in &images {
            print_tags(image_path)?;
        }
        return Ok(());
    }

    // Handle --check
    if cli.check {
        let mut failed = 0;
        for image_path in &images {
            match pipeline::check_image(image_path) {
                Ok(offset) => log::info!("OK: {} (DQT at {offset})", image_path.display()),
                Err(e) => {
                    failed += 1;
                    log::error!("Invalid: {}: {e:#}", image_path.display());
                }
            }
        }
        if failed > 0 {
            anyhow::bail!("{failed} of {} image(s) failed validation", images.len());
        }
        return Ok(());
    }

    // Load config
    let mut config = config::Config::load(cli.config.as_deref())?;

    // Override dry_run from CLI flag
    if cli.dry_run {
        config.output.dry_run = true;
    }

    let md = cli.select_metadata(&config)?;

    log::info!("Found {} image(s) to process", images.len());
    if config.output.dry_run {
        log::info!("DRY RUN — no files will be modified");
    }
    if md.is_empty() {
        log::info!("Stripping all metadata");
    }

    let mut results = Vec::new();
    let total = images.len();

    for (i, image_path) in images.iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", i + 1, total, image_path.display());

        let result = pipeline::process_image(image_path, &md, &config, cli.output.as_deref());

        if let Some(ref err) = result.error {
            log::error!("  Error: {err}");
        } else {
            if result.tags_written.is_empty() {
                log::info!("  Stripped metadata");
            } else {
                let names: Vec<&str> = result.tags_written.iter().map(|t| t.exif_name()).collect();
                log::info!("  Wrote: {}", names.join(", "));
            }
            if result.dry_run {
                log::info!("  Would write {} bytes to {}", result.bytes_written, result.output_path.display());
            } else {
                log::info!("  {} bytes → {}", result.bytes_written, result.output_path.display());
            }
            if let Some(ref backup) = result.backup_path {
                log::debug!("  Backup: {}", backup.display());
            }
        }

        results.push(result);
    }

    // JSON output
    if cli.json {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "path": r.path.display().to_string(),
                    "output_path": r.output_path.display().to_string(),
                    "tags_written": r.tags_written,
                    "bytes_written": r.bytes_written,
                    "backup_path": r.backup_path.as_ref().map(|p| p.display().to_string()),
                    "dry_run": r.dry_run,
                    "error": r.error,
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    // Summary
    let success = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    log::info!("Done: {success} succeeded, {failed} failed out of {total} images");

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Max width for the value column before wrapping.
const VAL_WIDTH: usize = 46;
/// Indent for continuation lines (tag column width + " : " = 25 chars + 2 leading spaces).
const INDENT: &str = "                           ";

/// Print the IFD0 string tags of a file.
fn print_tags(path: &std::path::Path) -> Result<()> {
    let data = exif::read_meta(path)?;

    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("{DIM}{}{RESET}", "═".repeat(72));

    if data.is_empty() {
        println!("  {DIM}(no EXIF metadata found){RESET}");
        println!();
        return Ok(());
    }

    for tag in Tag::ALL {
        if let Some(val) = data.get(&tag) {
            print_row(tag.exif_name(), val);
        }
    }
    println!();

    Ok(())
}

/// Print one tag row, continuing long values under the value column.
fn print_row(name: &str, val: &str) {
    let mut lines = wrap_text(val, VAL_WIDTH).into_iter();
    let first = lines.next().unwrap_or_default();
    println!("  {name:<22} : {first}");
    for line in lines {
        println!("  {INDENT}{line}");
    }
}

/// Wrap `s` at word boundaries into lines of at most `max_width` chars.
///
/// Words longer than a line (paths, URLs) are split across lines. Always
/// returns at least one line.
fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in s.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        let width = current.chars().count();

        if !current.is_empty() && width + 1 + chars.len() <= max_width {
            current.push(' ');
            current.extend(chars);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        while chars.len() > max_width {
            let rest = chars.split_off(max_width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        current.extend(chars);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
