// ezfs: command-line front end over the ezfs filesystem facade.
// Usage: ezfs [--force] [-v] [--log-file <path>] <command> ...

mod logging;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ezfs::{SizeUnit, UploadBatch, UploadItem};

#[derive(Parser, Debug)]
#[command(name = "ezfs", version, about = "Safer, higher-level filesystem operations")]
struct Cli {
    /// Allow paths containing `..`
    #[arg(long, global = true)]
    force: bool,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print `true` or `false` depending on whether the path exists
    Exists { path: PathBuf },
    /// List the children of a directory
    List { path: PathBuf },
    /// Create a directory (no extension) or an empty file (with extension)
    Create {
        path: PathBuf,
        #[arg(long)]
        sanitize: bool,
    },
    /// Copy a file or directory tree
    Copy { from: PathBuf, to: PathBuf },
    /// Move a file or directory tree
    Mv { from: PathBuf, to: PathBuf },
    /// Rename within the same directory
    Rename {
        path: PathBuf,
        new_name: String,
        #[arg(long)]
        sanitize: bool,
    },
    /// Delete a file or directory tree
    Rm { path: PathBuf },
    /// Print the recursive size in bytes
    Size {
        path: PathBuf,
        /// Print a human-readable size instead of bytes
        #[arg(long)]
        human: bool,
    },
    /// Change permission bits, given in octal (e.g. 755)
    Chmod { mode: String, path: PathBuf },
    /// Print path information as JSON
    Info { path: PathBuf },
    /// Print a file's content
    Read { path: PathBuf },
    /// Write (or append) text to a file
    Write {
        path: PathBuf,
        content: String,
        #[arg(long)]
        append: bool,
    },
    /// Zip a directory into `<dest>/<name>.zip`
    Zip { source: PathBuf, dest: PathBuf },
    /// Extract a zip archive into a directory
    Unzip { archive: PathBuf, dest: PathBuf },
    /// Copy a file, or a directory as zip, into `--out`
    Download {
        path: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Move files into an upload directory and print the outcome as JSON
    Upload {
        root: PathBuf,
        files: Vec<PathBuf>,
        /// Rename stored files to `<template>_<n>.<ext>`
        #[arg(long, value_name = "TEMPLATE")]
        rename: Option<String>,
        /// Comma-separated list of accepted extensions
        #[arg(long, value_delimiter = ',')]
        accept: Vec<String>,
    },
    /// Format a size for humans
    FormatSize {
        size: u64,
        #[arg(long, default_value = "B")]
        unit: SizeUnit,
        #[arg(long)]
        raw: bool,
    },
    /// Print the sanitized form of a name
    Sanitize { name: String },
}

fn main() {
    let cli = Cli::parse();
    let _guard = match logging::init(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialise logging: {e:#}");
            exit(2);
        }
    };

    if let Err(e) = run(cli) {
        tracing::debug!("command failed: {e:?}");
        eprintln!("Error: {e:#}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let force = cli.force;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Exists { path } => writeln!(stdout, "{}", ezfs::exists(&path, force)?)?,
        Command::List { path } => {
            for child in ezfs::list(&path, force)? {
                writeln!(stdout, "{}", child.display())?;
            }
        }
        Command::Create { path, sanitize } => ezfs::create(&path, sanitize, force)?,
        Command::Copy { from, to } => ezfs::copy_path(&from, &to, force)?,
        Command::Mv { from, to } => ezfs::move_path(&from, &to, force)?,
        Command::Rename { path, new_name, sanitize } => {
            ezfs::rename_path(&path, &new_name, sanitize, force)?
        }
        Command::Rm { path } => ezfs::delete_path(&path, force)?,
        Command::Size { path, human } => {
            let bytes = ezfs::path_size(&path, force)?;
            if human {
                writeln!(stdout, "{}", ezfs::format_size(bytes, SizeUnit::B, false))?;
            } else {
                writeln!(stdout, "{bytes}")?;
            }
        }
        Command::Chmod { mode, path } => {
            let mode = u32::from_str_radix(mode.trim_start_matches("0o"), 8)
                .with_context(|| format!("`{mode}` is not an octal mode"))?;
            ezfs::change_permissions(&path, mode, force)?;
        }
        Command::Info { path } => {
            let info = ezfs::path_info(&path, force)?;
            serde_json::to_writer_pretty(&mut stdout, &info)?;
            writeln!(stdout)?;
        }
        Command::Read { path } => write!(stdout, "{}", ezfs::read_file(&path, force)?)?,
        Command::Write { path, content, append } => {
            ezfs::write_file(&path, content, !append, force)?
        }
        Command::Zip { source, dest } => {
            let archive = ezfs::zip_dir(&source, &dest, force)?;
            writeln!(stdout, "{}", archive.display())?;
        }
        Command::Unzip { archive, dest } => ezfs::unzip(&archive, &dest, force)?,
        Command::Download { path, out } => {
            let source = ezfs::download(&path, force)?;
            let name = source.download_name.clone();
            let mut file =
                File::create(&out).with_context(|| format!("creating {}", out.display()))?;
            let sent = source.send_to(&mut file)?;
            writeln!(stdout, "{name}: {sent} bytes")?;
        }
        Command::Upload { root, files, rename, accept } => {
            let items = files
                .iter()
                .map(|f| -> Result<UploadItem> {
                    let name = f
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .with_context(|| format!("{} has no file name", f.display()))?;
                    Ok(UploadItem::new(name, f))
                })
                .collect::<Result<Vec<_>>>()?;
            let accept: Vec<&str> = accept.iter().map(String::as_str).collect();
            let outcome = ezfs::upload(
                &root,
                &UploadBatch::from(items),
                rename.as_deref(),
                &accept,
                force,
            )?;
            serde_json::to_writer_pretty(&mut stdout, &outcome)?;
            writeln!(stdout)?;
        }
        Command::FormatSize { size, unit, raw } => {
            writeln!(stdout, "{}", ezfs::format_size(size, unit, raw))?
        }
        Command::Sanitize { name } => writeln!(stdout, "{}", ezfs::sanitize_name(&name))?,
    }
    Ok(())
}
