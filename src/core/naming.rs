use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::models::Song;

/// How copied files are named. Selected once per run by its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingStrategy {
    /// `"001 (128 bpm) track.mp3"`
    #[default]
    Full,
    /// `"001 track.mp3"`
    Pos,
    /// `"(128 bpm) track.mp3"`
    Bpm,
    /// `"track.mp3"`
    None,
}

impl NamingStrategy {
    pub const ALL: [NamingStrategy; 4] = [
        NamingStrategy::Full,
        NamingStrategy::Pos,
        NamingStrategy::Bpm,
        NamingStrategy::None,
    ];

    pub fn key(self) -> &'static str {
        match self {
            NamingStrategy::Full => "full",
            NamingStrategy::Pos => "pos",
            NamingStrategy::Bpm => "bpm",
            NamingStrategy::None => "none",
        }
    }

    /// Destination file name for the song at 1-based `position`.
    /// Songs without a local file get an empty base name.
    pub fn file_name(self, position: usize, song: &Song) -> String {
        let name = song.file_name().unwrap_or_default();
        match self {
            NamingStrategy::Full => {
                format!("{:03} ({:03} bpm) {}", position, display_bpm(song.bpm), name)
            }
            NamingStrategy::Pos => format!("{:03} {}", position, name),
            NamingStrategy::Bpm => format!("({:03} bpm) {}", display_bpm(song.bpm), name),
            NamingStrategy::None => name.to_string(),
        }
    }
}

/// BPM is truncated, never rounded: 127.8 shows as 127.
fn display_bpm(bpm: f64) -> u64 {
    bpm.trunc() as u64
}

impl FromStr for NamingStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NamingStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.key() == s)
            .ok_or_else(|| ConfigError::UnknownPrefix {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
