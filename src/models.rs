use std::path::PathBuf;
use std::time::Duration;

/// URI scheme of songs stored on the local disk.
pub const FILE_SOURCE: &str = "file";

/// A file on the local disk that a song points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub full_path: PathBuf,
    pub file_name: String,
}

/// Where a song comes from: the URI scheme, plus the file when the scheme is `file`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    kind: String,
    file: Option<LocalFile>,
}

impl Source {
    pub fn local(full_path: PathBuf, file_name: String) -> Self {
        Source {
            kind: FILE_SOURCE.to_string(),
            file: Some(LocalFile {
                full_path,
                file_name,
            }),
        }
    }

    /// A non-local source. Never carries a file.
    pub fn remote(kind: impl Into<String>) -> Self {
        Source {
            kind: kind.into(),
            file: None,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn file(&self) -> Option<&LocalFile> {
        self.file.as_ref()
    }

    pub fn is_local(&self) -> bool {
        self.file.is_some()
    }
}

/// One entry of a djay playlist export.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: Duration,
    pub bpm: f64,
    pub key: String,
    pub url: String,
    pub source: Source,
}

impl Song {
    pub fn file_name(&self) -> Option<&str> {
        self.source.file().map(|f| f.file_name.as_str())
    }

    pub fn full_path(&self) -> Option<&PathBuf> {
        self.source.file().map(|f| &f.full_path)
    }

    pub fn summary(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

/// Songs in set order. Only the playlist parser builds one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    songs: Vec<Song>,
}

impl Playlist {
    pub(crate) fn from_songs(songs: Vec<Song>) -> Self {
        Playlist { songs }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Song> {
        self.songs.iter()
    }

    pub fn local_count(&self) -> usize {
        self.songs.iter().filter(|s| s.source.is_local()).count()
    }

    pub fn total_duration(&self) -> Duration {
        self.songs.iter().map(|s| s.duration).sum()
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Song;
    type IntoIter = std::slice::Iter<'a, Song>;

    fn into_iter(self) -> Self::IntoIter {
        self.songs.iter()
    }
}

#[cfg(test)]
pub(crate) fn test_song(title: &str, bpm: f64, source: Source) -> Song {
    Song {
        title: title.to_string(),
        artist: "Artist".to_string(),
        album: String::new(),
        duration: Duration::from_secs(200),
        bpm,
        key: "8A".to_string(),
        url: String::new(),
        source,
    }
}
