// src/core/errors.rs

//! Defines the primary error type for the entire application.
//!
//! Every domain failure a command can hit has its own variant whose `Display`
//! text is the exact message sent back to the client. Runtime failures (I/O,
//! audio, persistence) are logged instead and the client only sees a generic
//! apology.

use std::sync::Arc;
use thiserror::Error;

/// The reply sent to a client when a runtime failure interrupts its command.
pub const APOLOGY: &str = "An error occurred with the song. Sorry for the inconvenience.";

/// The main error enum, representing all possible failures within the server.
#[derive(Error, Debug, Clone)]
pub enum TunecastError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Line exceeds the maximum length of {0} bytes")]
    LineTooLong(usize),

    #[error("Unknown command")]
    UnknownCommand(String),

    #[error(
        "Invalid count of arguments: \"{command}\" expects {expected} arguments. Example: \"{example}\""
    )]
    WrongArgumentCount {
        command: &'static str,
        expected: usize,
        example: &'static str,
    },

    #[error(
        "Invalid count of arguments: {command} expects more than zero arguments. Example: \"{example}\""
    )]
    MissingArguments {
        command: &'static str,
        example: &'static str,
    },

    #[error("You must be logged in to execute this command!")]
    AuthRequired,

    #[error("You are logged in. You cannot register.")]
    RegisterWhileLoggedIn,

    #[error("You are logged in. You cannot do it again.")]
    AlreadyLoggedIn,

    #[error("A user with such an email already exists.")]
    AccountExists,

    #[error("Wrong email format!")]
    InvalidEmail,

    #[error("Wrong password. Please, try again")]
    WrongPassword,

    #[error("Such an account does not exist. You can register.")]
    AccountNotFound,

    #[error("You must enter a number!")]
    NotANumber,

    #[error("The number must not be negative!")]
    NegativeNumber,

    #[error("A playlist with such a name already exists.")]
    PlaylistExists,

    #[error("The name cannot be blank.")]
    BlankName,

    #[error("A playlist with such a name does not exist.")]
    PlaylistNotFound,

    #[error("A song is already added in playlist {0}. Cannot be added a second time.")]
    SongAlreadyInPlaylist(String),

    #[error("A song with such a name does not exist.")]
    SongNotFound,

    /// The song behind an active playback disappeared from the catalog.
    #[error("A song with a name {0} does not exist.")]
    StreamedSongMissing(String),

    #[error("You are already listening to a song")]
    AlreadyStreaming,

    #[error("You are not listening to a song")]
    NotStreaming,

    #[error("Audio Error: {0}")]
    Audio(String),

    #[error("Persistence Error: {0}")]
    Persistence(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl TunecastError {
    /// True for failures that are the server's fault rather than the client's.
    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            TunecastError::Io(_)
                | TunecastError::Audio(_)
                | TunecastError::Persistence(_)
                | TunecastError::Internal(_)
        )
    }

    /// The text a client gets for this error.
    pub fn client_message(&self) -> String {
        if self.is_runtime() {
            APOLOGY.to_string()
        } else {
            self.to_string()
        }
    }
}

impl PartialEq for TunecastError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TunecastError::Io(e1), TunecastError::Io(e2)) => e1.kind() == e2.kind(),
            (TunecastError::LineTooLong(a), TunecastError::LineTooLong(b)) => a == b,
            (TunecastError::UnknownCommand(a), TunecastError::UnknownCommand(b)) => a == b,
            (
                TunecastError::WrongArgumentCount { command: c1, .. },
                TunecastError::WrongArgumentCount { command: c2, .. },
            ) => c1 == c2,
            (
                TunecastError::MissingArguments { command: c1, .. },
                TunecastError::MissingArguments { command: c2, .. },
            ) => c1 == c2,
            (TunecastError::SongAlreadyInPlaylist(a), TunecastError::SongAlreadyInPlaylist(b)) => {
                a == b
            }
            (TunecastError::StreamedSongMissing(a), TunecastError::StreamedSongMissing(b)) => {
                a == b
            }
            (TunecastError::Audio(a), TunecastError::Audio(b)) => a == b,
            (TunecastError::Persistence(a), TunecastError::Persistence(b)) => a == b,
            (TunecastError::Internal(a), TunecastError::Internal(b)) => a == b,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for TunecastError {
    fn from(e: std::io::Error) -> Self {
        TunecastError::Io(Arc::new(e))
    }
}

impl From<serde_json::Error> for TunecastError {
    fn from(e: serde_json::Error) -> Self {
        TunecastError::Persistence(format!("JSON serialization/deserialization error: {e}"))
    }
}

impl From<symphonia::core::errors::Error> for TunecastError {
    fn from(e: symphonia::core::errors::Error) -> Self {
        TunecastError::Audio(e.to_string())
    }
}

impl From<argon2::password_hash::Error> for TunecastError {
    fn from(e: argon2::password_hash::Error) -> Self {
        TunecastError::Internal(format!("Password hashing failed: {e}"))
    }
}
