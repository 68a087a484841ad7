use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::{Input, Select};

use crate::config::{self, CopyConfig};
use crate::core::copier::{self, CopyReporter, SkippedSong};
use crate::core::duration::format_duration;
use crate::core::naming::NamingStrategy;
use crate::core::parser;
use crate::models::{Playlist, Song};

#[derive(Parser)]
#[command(
    name = "djay-tools",
    about = "Command-line companion for Algoriddim djay Pro",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy playlist files into a directory
    ///
    /// First export the playlist from djay as a CSV file and use it as input.
    /// By default files are named after their position in the playlist and
    /// their BPM, e.g. "001 (128 bpm) Some Song.mp3".
    Cp {
        /// Playlist exported from djay (CSV)
        playlist: PathBuf,
        /// Output directory [default: .]
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// File name prefix: full, pos, bpm, none [default: full]
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Show the songs of a playlist and the names they would be copied as
    Ls {
        /// Playlist exported from djay (CSV)
        playlist: PathBuf,
        /// File name prefix: full, pos, bpm, none [default: full]
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Edit the default output directory and prefix
    Config,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Cp {
            playlist,
            output,
            prefix,
        } => cmd_cp(&playlist, output, prefix),
        Commands::Ls { playlist, prefix } => cmd_ls(&playlist, prefix),
        Commands::Config => cmd_config(),
    }
}

fn read_playlist(path: &Path) -> Result<Playlist> {
    let file = File::open(path).with_context(|| format!("failed to open {:?}", path))?;
    parser::parse_playlist(BufReader::new(file))
        .with_context(|| format!("failed to parse {:?}", path))
}

/// Prints one line per copied or skipped song.
struct ConsoleReporter;

impl CopyReporter for ConsoleReporter {
    fn skipped(&mut self, song: &SkippedSong) {
        println!(
            "- Skipping {} song: {} - {}",
            song.source, song.artist, song.title
        );
    }

    fn copied(&mut self, _position: usize, _song: &Song, destination: &Path) {
        println!("+ Copied {:?}", destination);
    }
}

fn cmd_cp(path: &Path, output: Option<PathBuf>, prefix: Option<String>) -> Result<()> {
    let cfg = config::load_config();
    let options = cfg.copy.resolve(output, prefix)?;

    println!("Reading playlist from {:?}", path);
    let playlist = read_playlist(path)?;

    println!("Copying files to {:?}\n", options.output_dir);
    let summary = copier::copy_playlist(&playlist, &options, &mut ConsoleReporter)?;

    println!(
        "\nCopied {} files (skipped {})",
        summary.copied,
        summary.skipped.len()
    );
    Ok(())
}

fn cmd_ls(path: &Path, prefix: Option<String>) -> Result<()> {
    let cfg = config::load_config();
    let options = cfg.copy.resolve(None, prefix)?;
    let playlist = read_playlist(path)?;

    if playlist.is_empty() {
        println!("{:?} has no songs", path);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "#", "Artist", "Title", "Album", "Time", "BPM", "Key", "Source", "Copy as",
    ]);

    for (index, song) in playlist.iter().enumerate() {
        let position = index + 1;
        let copy_as = if song.source.is_local() {
            options.naming.file_name(position, song)
        } else {
            "-".to_string()
        };

        table.add_row(vec![
            Cell::new(position),
            Cell::new(&song.artist),
            Cell::new(&song.title),
            Cell::new(&song.album),
            Cell::new(format_duration(song.duration)),
            Cell::new(format!("{:.1}", song.bpm)),
            Cell::new(&song.key),
            Cell::new(song.source.kind()),
            Cell::new(copy_as),
        ]);
    }

    println!("{table}");
    println!(
        "\n{} songs ({} local files), total {}",
        playlist.len(),
        playlist.local_count(),
        format_duration(playlist.total_duration()),
    );

    Ok(())
}

fn cmd_config() -> Result<()> {
    let mut cfg = config::load_config();

    println!("Default copy settings\n");

    let current_output = cfg
        .copy
        .output_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string());

    let output_dir: String = Input::new()
        .with_prompt("Output directory")
        .with_initial_text(current_output)
        .interact_text()?;

    let current_prefix = cfg
        .copy
        .prefix
        .as_deref()
        .and_then(|p| p.parse::<NamingStrategy>().ok())
        .unwrap_or_default();

    let keys: Vec<&str> = NamingStrategy::ALL.iter().map(|s| s.key()).collect();
    let selection = Select::new()
        .with_prompt("File name prefix")
        .items(&keys)
        .default(
            NamingStrategy::ALL
                .iter()
                .position(|s| *s == current_prefix)
                .unwrap_or(0),
        )
        .interact()?;

    cfg.copy = CopyConfig {
        output_dir: Some(PathBuf::from(output_dir)),
        prefix: Some(keys[selection].to_string()),
    };

    let path = config::save_config(&cfg)?;
    println!("\nSaved to {}", path.display());
    Ok(())
}
