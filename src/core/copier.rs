use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::naming::NamingStrategy;
use crate::error::CopyError;
use crate::models::{Playlist, Song};

/// Resolved settings for one copy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOptions {
    pub output_dir: PathBuf,
    pub naming: NamingStrategy,
}

impl Default for CopyOptions {
    fn default() -> Self {
        CopyOptions {
            output_dir: PathBuf::from("."),
            naming: NamingStrategy::default(),
        }
    }
}

/// Receives progress while a playlist is copied.
pub trait CopyReporter {
    fn skipped(&mut self, song: &SkippedSong);
    fn copied(&mut self, position: usize, song: &Song, destination: &Path);
}

/// A song that was not copied because it has no local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSong {
    pub source: String,
    pub artist: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub copied: usize,
    pub skipped: Vec<SkippedSong>,
}

/// Copy every local song of the playlist into `options.output_dir`, in set order.
///
/// Songs from other sources are skipped. The first failed copy stops the run;
/// files copied before it stay where they are.
pub fn copy_playlist<R: CopyReporter>(
    playlist: &Playlist,
    options: &CopyOptions,
    reporter: &mut R,
) -> Result<CopySummary, CopyError> {
    info!(
        songs = playlist.len(),
        output = %options.output_dir.display(),
        prefix = %options.naming,
        "copying playlist"
    );

    let mut summary = CopySummary::default();
    for (index, song) in playlist.iter().enumerate() {
        let position = index + 1;

        let Some(src) = song.full_path() else {
            debug!(position, source = song.source.kind(), "skipping non-local song");
            let skipped = SkippedSong {
                source: song.source.kind().to_string(),
                artist: song.artist.clone(),
                title: song.title.clone(),
            };
            reporter.skipped(&skipped);
            summary.skipped.push(skipped);
            continue;
        };

        let dst = options
            .output_dir
            .join(options.naming.file_name(position, song));
        let bytes = copy_file(src, &dst)?;
        debug!(position, src = %src.display(), dst = %dst.display(), bytes, "copied");

        summary.copied += 1;
        reporter.copied(position, song, &dst);
    }

    info!(
        copied = summary.copied,
        skipped = summary.skipped.len(),
        "playlist copied"
    );
    Ok(summary)
}

/// Byte-for-byte copy of `src` into a newly created (or truncated) `dst`.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, CopyError> {
    let mut src_file = File::open(src).map_err(|source| CopyError::OpenSource {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })?;
    let mut dst_file = File::create(dst).map_err(|source| CopyError::CreateDestination {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })?;

    io::copy(&mut src_file, &mut dst_file).map_err(|source| CopyError::Transfer {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_playlist;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        skipped: Vec<String>,
        copied: Vec<(usize, PathBuf)>,
    }

    impl CopyReporter for Recorder {
        fn skipped(&mut self, song: &SkippedSong) {
            self.skipped.push(song.title.clone());
        }

        fn copied(&mut self, position: usize, _song: &Song, destination: &Path) {
            self.copied.push((position, destination.to_path_buf()));
        }
    }

    /// Writes the given files into a scratch library and builds a playlist CSV
    /// whose rows point at them. `None` makes an apple-music row.
    fn library(files: &[Option<(&str, &str, &str)>]) -> (TempDir, Playlist) {
        let dir = TempDir::new().unwrap();
        let mut csv = String::from("Title,Artist,Album,Duration,BPM,Key,URL\n");
        for (i, file) in files.iter().enumerate() {
            match file {
                Some((name, content, bpm)) => {
                    let path = dir.path().join(name);
                    fs::write(&path, content).unwrap();
                    csv.push_str(&format!(
                        "Song {i},Artist,,3:00,{bpm},1A,file://{}\n",
                        path.display()
                    ));
                }
                None => csv.push_str(&format!(
                    "Song {i},Artist,,3:00,120,1A,apple-music:track/{i}\n"
                )),
            }
        }
        let playlist = parse_playlist(csv.as_bytes()).unwrap();
        (dir, playlist)
    }

    #[test]
    fn test_copies_local_and_skips_remote() {
        let (_lib, playlist) = library(&[None, Some(("a.mp3", "abc", "127.8"))]);
        let out = TempDir::new().unwrap();
        let options = CopyOptions {
            output_dir: out.path().to_path_buf(),
            naming: NamingStrategy::Full,
        };
        let mut recorder = Recorder::default();

        let summary = copy_playlist(&playlist, &options, &mut recorder).unwrap();

        assert_eq!(summary.copied, 1);
        assert_eq!(
            summary.skipped,
            vec![SkippedSong {
                source: "apple-music".to_string(),
                artist: "Artist".to_string(),
                title: "Song 0".to_string(),
            }]
        );
        let expected = out.path().join("002 (127 bpm) a.mp3");
        assert_eq!(fs::read(&expected).unwrap(), b"abc");
        assert_eq!(recorder.copied, vec![(2, expected)]);
        assert_eq!(recorder.skipped, vec!["Song 0".to_string()]);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_naming_strategy_applied_in_order() {
        let (_lib, playlist) = library(&[
            Some(("one.mp3", "1", "")),
            Some(("two.mp3", "22", "90")),
        ]);
        let out = TempDir::new().unwrap();
        let options = CopyOptions {
            output_dir: out.path().to_path_buf(),
            naming: NamingStrategy::Pos,
        };

        let summary = copy_playlist(&playlist, &options, &mut Recorder::default()).unwrap();

        assert_eq!(summary.copied, 2);
        assert_eq!(fs::read(out.path().join("001 one.mp3")).unwrap(), b"1");
        assert_eq!(fs::read(out.path().join("002 two.mp3")).unwrap(), b"22");
    }

    #[test]
    fn test_missing_output_dir_aborts_on_first_copy() {
        let (_lib, playlist) = library(&[
            Some(("one.mp3", "1", "120")),
            Some(("two.mp3", "2", "120")),
        ]);
        let out = TempDir::new().unwrap();
        let missing = out.path().join("does-not-exist");
        let options = CopyOptions {
            output_dir: missing.clone(),
            naming: NamingStrategy::None,
        };
        let mut recorder = Recorder::default();

        let err = copy_playlist(&playlist, &options, &mut recorder).unwrap_err();

        match err {
            CopyError::CreateDestination { dst, .. } => assert_eq!(dst, missing.join("one.mp3")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(recorder.copied.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_output_dir_aborts_on_first_copy() {
        use std::os::unix::fs::PermissionsExt;

        let (_lib, playlist) = library(&[
            Some(("one.mp3", "1", "120")),
            Some(("two.mp3", "2", "120")),
        ]);
        let out = TempDir::new().unwrap();
        let locked = out.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind a privileged user.
        if fs::write(locked.join(".writable"), b"").is_ok() {
            return;
        }

        let options = CopyOptions {
            output_dir: locked.clone(),
            naming: NamingStrategy::Pos,
        };
        let mut recorder = Recorder::default();

        let err = copy_playlist(&playlist, &options, &mut recorder).unwrap_err();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        match err {
            CopyError::CreateDestination { dst, .. } => {
                assert_eq!(dst, locked.join("001 one.mp3"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(recorder.copied.is_empty());
        assert_eq!(fs::read_dir(&locked).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_source_stops_run_without_rollback() {
        let (lib, playlist) = library(&[
            Some(("one.mp3", "1", "120")),
            Some(("gone.mp3", "2", "120")),
            Some(("three.mp3", "3", "120")),
        ]);
        fs::remove_file(lib.path().join("gone.mp3")).unwrap();
        let out = TempDir::new().unwrap();
        let options = CopyOptions {
            output_dir: out.path().to_path_buf(),
            naming: NamingStrategy::None,
        };
        let mut recorder = Recorder::default();

        let err = copy_playlist(&playlist, &options, &mut recorder).unwrap_err();

        assert!(matches!(err, CopyError::OpenSource { ref src, .. } if src.ends_with("gone.mp3")));
        assert!(out.path().join("one.mp3").exists());
        assert!(!out.path().join("three.mp3").exists());
        assert_eq!(recorder.copied.len(), 1);
    }

    #[test]
    fn test_empty_playlist() {
        let out = TempDir::new().unwrap();
        let options = CopyOptions {
            output_dir: out.path().to_path_buf(),
            ..CopyOptions::default()
        };
        let summary = copy_playlist(&Playlist::default(), &options, &mut Recorder::default()).unwrap();
        assert_eq!(summary, CopySummary::default());
    }

    #[test]
    fn test_copy_file_overwrites() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.mp3");
        let dst = dir.path().join("dst.mp3");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old contents").unwrap();

        assert_eq!(copy_file(&src, &dst).unwrap(), 3);
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn test_default_options() {
        let options = CopyOptions::default();
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert_eq!(options.naming, NamingStrategy::Full);
    }
}
