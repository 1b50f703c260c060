use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// Maximum number of items requested per key lookup.
///
/// Two is enough to tell "exactly one" from "more than one" without pulling
/// a potentially large result set.
pub const LIST_ITEMS_LIMIT: u32 = 2;

/// MultiChain JSON-RPC commands issued by the repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// `liststreamkeyitems stream key verbose count`
    ListStreamKeyItems,
    /// `publish stream key data`
    Publish,
}

impl Command {
    /// Method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListStreamKeyItems => "liststreamkeyitems",
            Self::Publish => "publish",
        }
    }

    pub fn all() -> [Command; 2] {
        [Self::ListStreamKeyItems, Self::Publish]
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownMethod(s.to_string()))
    }
}
