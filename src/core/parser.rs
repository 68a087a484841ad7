use std::io::Read;
use std::path::PathBuf;

use tracing::debug;
use url::Url;

use crate::core::duration::parse_duration;
use crate::error::{FormatError, PlaylistError, QuoteError};
use crate::models::{Playlist, Song, Source, FILE_SOURCE};

/// Number of columns in a djay playlist export:
/// Title, Artist, Album, Duration, BPM, Key, URL.
pub const RECORD_FIELDS: usize = 7;

/// Parse a djay CSV playlist. The first row is the header and is always dropped.
///
/// Fails on the first bad row; no partial playlist is returned.
pub fn parse_playlist<R: Read>(mut reader: R) -> Result<Playlist, PlaylistError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(csv::Error::from)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_slice());

    let mut songs = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut row = 0;
    loop {
        let start = csv_reader.position().clone();
        if !csv_reader.read_record(&mut record)? {
            break;
        }
        let raw = data
            .get(start.byte() as usize..csv_reader.position().byte() as usize)
            .unwrap_or_default();
        check_quotes(raw).map_err(|reason| {
            PlaylistError::Quote {
                line: record.position().map_or(start.line(), |p| p.line()),
                reason,
            }
        })?;

        row += 1;
        if row == 1 {
            continue;
        }

        let fields: Vec<&str> = record.iter().collect();
        let song = parse_song(&fields).map_err(|source| PlaylistError::Song {
            position: songs.len() + 1,
            source,
        })?;
        debug!(
            position = songs.len() + 1,
            song = %song.summary(),
            url = %song.url,
            "parsed song"
        );
        songs.push(song);
    }

    Ok(Playlist::from_songs(songs))
}

#[derive(Clone, Copy)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Strict RFC 4180 quoting over the raw bytes of one record.
/// The csv reader lets stray and unterminated quotes through.
fn check_quotes(raw: &[u8]) -> Result<(), QuoteError> {
    let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw);

    let mut state = QuoteState::FieldStart;
    for &b in raw {
        state = match (state, b) {
            (QuoteState::FieldStart, b'"') => QuoteState::Quoted,
            (QuoteState::FieldStart | QuoteState::Unquoted, b',' | b'\r' | b'\n') => {
                QuoteState::FieldStart
            }
            (QuoteState::Unquoted, b'"') => return Err(QuoteError::BareQuote),
            (QuoteState::FieldStart | QuoteState::Unquoted, _) => QuoteState::Unquoted,
            (QuoteState::Quoted, b'"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, b'"') => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, b',' | b'\r' | b'\n') => QuoteState::FieldStart,
            (QuoteState::QuoteInQuoted, _) => return Err(QuoteError::ExtraneousQuote),
        };
    }

    match state {
        QuoteState::Quoted => Err(QuoteError::Unterminated),
        _ => Ok(()),
    }
}

/// Parse one playlist row into a Song.
pub fn parse_song<S: AsRef<str>>(record: &[S]) -> Result<Song, FormatError> {
    if record.len() != RECORD_FIELDS {
        return Err(FormatError::FieldCount {
            expected: RECORD_FIELDS,
            found: record.len(),
        });
    }
    let field: Vec<&str> = record.iter().map(AsRef::as_ref).collect();

    let duration = parse_duration(field[3]).map_err(|reason| FormatError::Duration {
        value: field[3].to_string(),
        reason,
    })?;
    let bpm = parse_bpm(field[4])?;
    let source = parse_source(field[6])?;

    Ok(Song {
        title: field[0].to_string(),
        artist: field[1].to_string(),
        album: field[2].to_string(),
        duration,
        bpm,
        key: field[5].to_string(),
        url: field[6].to_string(),
        source,
    })
}

/// An empty BPM column means the track was never analyzed.
fn parse_bpm(value: &str) -> Result<f64, FormatError> {
    if value.is_empty() {
        return Ok(0.0);
    }
    let bpm: f64 = value.parse().map_err(|source| FormatError::Bpm {
        value: value.to_string(),
        source,
    })?;
    if !bpm.is_finite() || bpm < 0.0 {
        return Err(FormatError::InvalidBpm {
            value: value.to_string(),
        });
    }
    Ok(bpm)
}

/// Classify a song by its URL scheme. Only `file` URLs carry a path.
fn parse_source(value: &str) -> Result<Source, FormatError> {
    if value.is_empty() {
        return Ok(Source::default());
    }

    // A scheme-less reference (a bare path) has no source, like an empty URL.
    let url = match Url::parse(value) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => return Ok(Source::default()),
        Err(source) => {
            return Err(FormatError::Url {
                value: value.to_string(),
                source,
            })
        }
    };
    if url.scheme() != FILE_SOURCE {
        return Ok(Source::remote(url.scheme()));
    }

    let full_path =
        String::from_utf8_lossy(&urlencoding::decode_binary(url.path().as_bytes())).into_owned();
    let file_name = match full_path.rsplit_once('/') {
        Some((_, name)) => name.to_string(),
        None => full_path.clone(),
    };

    Ok(Source::local(PathBuf::from(full_path), file_name))
}
