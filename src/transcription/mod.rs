//! Transcription module for callsight
//!
//! Speech-to-text via the OpenAI Whisper API, plus the directory listing
//! that feeds the batch.

mod openai;

pub use openai::WhisperTranscriber;

use std::path::{Path, PathBuf};

use crate::Result;

/// List audio files with the given extension under a directory.
///
/// Sorted by file name so batch order (and therefore report row order) is
/// deterministic across platforms.
pub fn list_audio_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    tracing::info!("Listing .{} files in {}", extension, dir.display());

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if path.is_file() && matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_matching_extensions_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp3", "a.mp3", "notes.txt", "c.MP3"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = list_audio_files(dir.path(), "mp3").unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.mp3", "c.MP3"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(list_audio_files(&missing, "mp3").is_err());
    }
}
