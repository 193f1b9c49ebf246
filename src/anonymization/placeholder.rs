//! Placeholder identities substituted for real author names

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output identity assigned to a post's author
///
/// There are exactly two placeholders. The tracked author becomes
/// [`Placeholder::User`], everyone else [`Placeholder::Developer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placeholder {
    /// The tracked author
    User,
    /// Any other participant
    Developer,
}

impl Placeholder {
    /// Every placeholder, in a stable order
    pub const ALL: [Placeholder; 2] = [Placeholder::User, Placeholder::Developer];

    /// The literal substituted into the author field
    pub const fn as_str(self) -> &'static str {
        match self {
            Placeholder::User => "User",
            Placeholder::Developer => "Developer",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Placeholder {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
