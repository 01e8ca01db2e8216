//! Good bot / bad bot counters, optionally persisted as JSON.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur while loading or saving the tally.
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    /// Reading or writing the tally file failed.
    #[error("vote file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The tally file is not valid JSON.
    #[error("vote file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Running totals of chat votes on the bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// `good bot` count.
    pub upvotes: u64,
    /// `bad bot` count.
    pub downvotes: u64,
}

impl VoteTally {
    /// Load the tally from `path`. A missing file is an empty tally.
    ///
    /// # Errors
    ///
    /// Returns [`VoteError::Io`] if the file exists but cannot be read, or
    /// [`VoteError::Json`] if it does not hold a tally.
    pub fn load(path: &Path) -> Result<Self, VoteError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the tally to `path`, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`VoteError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), VoteError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Count one `good bot`.
    pub const fn upvote(&mut self) {
        self.upvotes = self.upvotes.saturating_add(1);
    }

    /// Count one `bad bot`.
    pub const fn downvote(&mut self) {
        self.downvotes = self.downvotes.saturating_add(1);
    }
}

impl fmt::Display for VoteTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Upvotes: {}, Downvotes: {}", self.upvotes, self.downvotes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_tally() {
        let dir = tempfile::tempdir().unwrap();
        let tally = VoteTally::load(&dir.path().join("votes.json")).unwrap();
        assert_eq!(tally, VoteTally::default());
    }

    #[test]
    fn saved_tally_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        let mut tally = VoteTally::default();
        tally.upvote();
        tally.upvote();
        tally.downvote();
        tally.save(&path).unwrap();

        let loaded = VoteTally::load(&path).unwrap();
        assert_eq!(loaded.upvotes, 2);
        assert_eq!(loaded.downvotes, 1);
        assert_eq!(loaded.to_string(), "Upvotes: 2, Downvotes: 1");
    }

    #[test]
    fn garbage_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(VoteTally::load(&path), Err(VoteError::Json(_))));
    }
}
