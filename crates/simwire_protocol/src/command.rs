//! # Command Set
//!
//! The seven operations the host understands, each identified by a
//! four-byte ASCII tag at the start of every frame. The set is closed:
//! the host predates this client and will not learn new tags at runtime.

/// Length of a command tag in bytes.
pub const TAG_LEN: usize = 4;

/// One protocol command.
///
/// Write-style commands are fire-and-forget: the host sends nothing back.
/// [`Command::GetDatarefs`] is the single read-style command and is the only
/// one the correlator ever waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Pause or resume the simulation (`SIMU`).
    Pause,
    /// Request the current values of named datarefs (`GETD`).
    GetDatarefs,
    /// Write one dataref with an array of floats (`DREF`).
    SetDataref,
    /// Write up to six control-surface axes for the player aircraft (`CTRL`).
    SetControls,
    /// Write up to seven position fields for one aircraft (`POSI`).
    SetPosition,
    /// Write rows of nine-field aircraft state (`DATA`).
    SetData,
    /// Rebind the client's receive port on the host side (`CONN`).
    SetConnection,
}

impl Command {
    /// Returns the wire tag for this command.
    #[must_use]
    pub const fn tag(self) -> [u8; TAG_LEN] {
        match self {
            Self::Pause => *b"SIMU",
            Self::GetDatarefs => *b"GETD",
            Self::SetDataref => *b"DREF",
            Self::SetControls => *b"CTRL",
            Self::SetPosition => *b"POSI",
            Self::SetData => *b"DATA",
            Self::SetConnection => *b"CONN",
        }
    }

    /// Looks up a command from a wire tag.
    ///
    /// Returns `None` for tags outside the closed set, including the
    /// host's own reply tags, which this client never dispatches on.
    #[must_use]
    pub const fn from_tag(tag: &[u8; TAG_LEN]) -> Option<Self> {
        match tag {
            b"SIMU" => Some(Self::Pause),
            b"GETD" => Some(Self::GetDatarefs),
            b"DREF" => Some(Self::SetDataref),
            b"CTRL" => Some(Self::SetControls),
            b"POSI" => Some(Self::SetPosition),
            b"DATA" => Some(Self::SetData),
            b"CONN" => Some(Self::SetConnection),
            _ => None,
        }
    }

    /// True for commands that expect a reply from the host.
    #[must_use]
    pub const fn expects_reply(self) -> bool {
        matches!(self, Self::GetDatarefs)
    }
}
