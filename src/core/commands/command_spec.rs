// src/core/commands/command_spec.rs

//! Static metadata for every command the server understands: its wire name,
//! how many arguments it takes, and the usage example quoted back to clients.

use crate::core::TunecastError;

/// How many arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

/// Every command recognised by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Register,
    Login,
    Search,
    Top,
    CreatePlaylist,
    AddSongTo,
    ShowPlaylist,
    Play,
    Stop,
    Disconnect,
}

impl CommandKind {
    pub const ALL: [CommandKind; 10] = [
        CommandKind::Register,
        CommandKind::Login,
        CommandKind::Search,
        CommandKind::Top,
        CommandKind::CreatePlaylist,
        CommandKind::AddSongTo,
        CommandKind::ShowPlaylist,
        CommandKind::Play,
        CommandKind::Stop,
        CommandKind::Disconnect,
    ];

    /// Looks up a command by its exact, case-sensitive wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Register => "register",
            CommandKind::Login => "login",
            CommandKind::Search => "search",
            CommandKind::Top => "top",
            CommandKind::CreatePlaylist => "create-playlist",
            CommandKind::AddSongTo => "add-song-to",
            CommandKind::ShowPlaylist => "show-playlist",
            CommandKind::Play => "play",
            CommandKind::Stop => "stop",
            CommandKind::Disconnect => "disconnect",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            CommandKind::Register | CommandKind::Login | CommandKind::Play => Arity::Exact(2),
            CommandKind::Search => Arity::AtLeast(1),
            CommandKind::Top | CommandKind::CreatePlaylist | CommandKind::ShowPlaylist => {
                Arity::Exact(1)
            }
            CommandKind::AddSongTo => Arity::Exact(3),
            CommandKind::Stop | CommandKind::Disconnect => Arity::Exact(0),
        }
    }

    /// The example invocation shown in usage errors.
    pub fn example(self) -> &'static str {
        match self {
            CommandKind::Register => "register <email> <password>",
            CommandKind::Login => "login <email> <password>",
            CommandKind::Search => "search <words>",
            CommandKind::Top => "top <number>",
            CommandKind::CreatePlaylist => "create-playlist <name_of_the_playlist>",
            CommandKind::AddSongTo => "add-song-to <name_of_the_playlist> <song_name> <artist>",
            CommandKind::ShowPlaylist => "show-playlist <name_of_the_playlist>",
            CommandKind::Play => "play <song_name> <artist>",
            CommandKind::Stop => "stop",
            CommandKind::Disconnect => "disconnect",
        }
    }

    /// Whether the command needs a logged-in session.
    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            CommandKind::Register | CommandKind::Login | CommandKind::Disconnect
        )
    }

    /// Checks the argument count against the command's arity.
    pub fn validate_arg_count(self, args: &[String]) -> Result<(), TunecastError> {
        match self.arity() {
            Arity::Exact(expected) if args.len() != expected => {
                Err(TunecastError::WrongArgumentCount {
                    command: self.name(),
                    expected,
                    example: self.example(),
                })
            }
            Arity::AtLeast(min) if args.len() < min => Err(TunecastError::MissingArguments {
                command: self.name(),
                example: self.example(),
            }),
            _ => Ok(()),
        }
    }
}
