//! CLI tool for secure archive extraction.

mod output;
mod progress;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use console::style;

use unpak::{ExtractMode, Extractor, OverwritePolicy, Report, SymlinkPolicy};

use output::{format_bytes, parse_size};
use progress::CliProgress;

/// Secure archive extraction - prevents Zip Slip and Zip Bombs
#[derive(Parser)]
#[command(name = "unpak")]
#[command(version, about = "Secure archive extraction - prevents Zip Slip and Zip Bombs", long_about = None)]
struct Cli {
    /// Archive file to extract (ZIP, TAR, TAR.GZ)
    archive: PathBuf,

    /// Destination directory
    #[arg(short = 'd', long, default_value = ".")]
    dest: PathBuf,

    /// List contents without extracting
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Verify archive integrity without extracting
    #[arg(long)]
    verify: bool,

    /// Maximum total size (e.g. 100M, 1G)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    max_size: Option<u64>,

    /// Maximum number of files
    #[arg(long, value_name = "N")]
    max_files: Option<u64>,

    /// Maximum directory depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u64>,

    /// Include files matching glob pattern (repeatable)
    #[arg(long = "include", value_name = "PATTERN")]
    include: Vec<String>,

    /// Exclude files matching glob pattern (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Extract only specific files (repeatable)
    #[arg(long = "only", value_name = "FILE")]
    only: Vec<String>,

    /// What to do if a file exists
    #[arg(long, value_enum, default_value = "error")]
    overwrite: OverwriteMode,

    /// What to do with symlink entries
    #[arg(long, value_enum, default_value = "skip")]
    symlinks: SymlinkMode,

    /// Validate all entries before extracting anything
    #[arg(long)]
    validate_first: bool,

    /// Quiet mode
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode (one line per entry)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OverwriteMode {
    Error,
    Skip,
    Overwrite,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SymlinkMode {
    Skip,
    Error,
}

impl From<OverwriteMode> for OverwritePolicy {
    fn from(mode: OverwriteMode) -> Self {
        match mode {
            OverwriteMode::Error => OverwritePolicy::Error,
            OverwriteMode::Skip => OverwritePolicy::Skip,
            OverwriteMode::Overwrite => OverwritePolicy::Overwrite,
        }
    }
}

impl From<SymlinkMode> for SymlinkPolicy {
    fn from(mode: SymlinkMode) -> Self {
        match mode {
            SymlinkMode::Skip => SymlinkPolicy::Skip,
            SymlinkMode::Error => SymlinkPolicy::Error,
        }
    }
}

/// Archive format, detected from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Zip,
    Tar,
    TarGz,
}

fn detect_format(path: &Path) -> Format {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Format::TarGz
    } else if name.ends_with(".tar") {
        Format::Tar
    } else {
        Format::Zip
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.archive.exists() {
        eprintln!(
            "{} archive not found: {}",
            style("error:").red().bold(),
            cli.archive.display()
        );
        return ExitCode::FAILURE;
    }

    let result = if cli.list {
        list_archive(&cli)
    } else if cli.verify {
        verify_archive(&cli)
    } else {
        extract_archive(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn list_archive(cli: &Cli) -> unpak::Result<()> {
    let entries = match detect_format(&cli.archive) {
        Format::Zip => unpak::list_zip_path(&cli.archive)?,
        Format::Tar => unpak::list_tar_path(&cli.archive)?,
        Format::TarGz => unpak::list_tar_gz_path(&cli.archive)?,
    };

    if !cli.quiet {
        println!("{} entries in {}:", entries.len(), cli.archive.display());
        println!();
    }

    let mut total_size = 0u64;
    for entry in &entries {
        let suffix = if entry.is_dir() {
            "/"
        } else if entry.is_symlink() {
            " -> [symlink]"
        } else {
            ""
        };
        println!("{:>10}  {}{}", format_bytes(entry.size), entry.name, suffix);
        total_size += entry.size;
    }

    if !cli.quiet {
        println!();
        println!(
            "Total: {} entries, {}",
            entries.len(),
            format_bytes(total_size)
        );
    }
    Ok(())
}

fn verify_archive(cli: &Cli) -> unpak::Result<()> {
    if !cli.quiet {
        println!("Verifying {}...", cli.archive.display());
    }

    let report = match detect_format(&cli.archive) {
        Format::Zip => unpak::verify_zip_path(&cli.archive)?,
        Format::Tar => unpak::verify_tar_path(&cli.archive)?,
        Format::TarGz => unpak::verify_tar_gz_path(&cli.archive)?,
    };

    if !cli.quiet {
        println!(
            "{} verified {} entries ({})",
            style("ok:").green().bold(),
            report.entries_verified,
            format_bytes(report.bytes_verified)
        );
    }
    Ok(())
}

fn extract_archive(cli: &Cli) -> unpak::Result<()> {
    let mut extractor = Extractor::new(&cli.dest)
        .overwrite(cli.overwrite.into())
        .symlinks(cli.symlinks.into());

    if let Some(max_size) = cli.max_size {
        extractor = extractor.max_total_bytes(max_size);
    }
    if let Some(max_files) = cli.max_files {
        extractor = extractor.max_files(max_files);
    }
    if let Some(max_depth) = cli.max_depth {
        extractor = extractor.max_depth(max_depth);
    }
    if cli.validate_first {
        extractor = extractor.mode(ExtractMode::ValidateFirst);
    }
    if !cli.only.is_empty() {
        extractor = extractor.only(cli.only.clone());
    }
    if !cli.include.is_empty() {
        extractor = extractor.include_glob(cli.include.clone());
    }
    if !cli.exclude.is_empty() {
        extractor = extractor.exclude_glob(cli.exclude.clone());
    }

    let bar = CliProgress::new(cli.quiet || cli.verbose);
    if cli.verbose {
        extractor = extractor.on_progress(|p| {
            match p.total_entries {
                Some(total) => println!("[{}/{}] {}", p.entry_index + 1, total, p.entry_name),
                None => println!("[{}] {}", p.entry_index + 1, p.entry_name),
            }
            Ok(())
        });
    } else {
        let bar = bar.clone();
        extractor = extractor.on_progress(move |p| {
            bar.update(p);
            Ok(())
        });
    }

    let report = match detect_format(&cli.archive) {
        Format::Zip => extractor.extract_zip_path(&cli.archive),
        Format::Tar => extractor.extract_tar_path(&cli.archive),
        Format::TarGz => extractor.extract_tar_gz_path(&cli.archive),
    };
    bar.finish();
    let report = report?;

    if !cli.quiet {
        print_report(&report, &cli.dest);
    }
    Ok(())
}

fn print_report(report: &Report, dest: &Path) {
    println!(
        "Extracted {} files ({}) to {}",
        report.files_extracted,
        format_bytes(report.bytes_written),
        dest.display()
    );
    if report.entries_skipped > 0 {
        println!("Skipped {} entries", report.entries_skipped);
    }
}
