//! Channel membership prefixes, such as operator (`@`) and voice (`+`).

#[cfg(test)]
mod tests;

use crate::{
    error::ParseError,
    mode::{Mode, ModeSet},
};

/// A membership rank: a mode letter and the prefix symbol that represents it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct Membership {
    /// The channel mode letter that grants this rank.
    pub mode: Mode,
    /// The symbol used in NAMES replies and WHO flags.
    pub prefix: char,
}

macro_rules! membership {
    ($mode:literal, $prefix:literal) => {
        Membership { mode: unsafe { Mode::new_unchecked($mode) }, prefix: $prefix }
    };
}

impl Membership {
    /// Channel founder, `+q` / `~`.
    pub const FOUNDER: Membership = membership!(b'q', '~');
    /// Protected user, `+a` / `&`.
    pub const PROTECTED: Membership = membership!(b'a', '&');
    /// Channel operator, `+o` / `@`.
    pub const OPERATOR: Membership = membership!(b'o', '@');
    /// Half-operator, `+h` / `%`.
    pub const HALFOP: Membership = membership!(b'h', '%');
    /// Voiced user, `+v` / `+`.
    pub const VOICE: Membership = membership!(b'v', '+');
}

/// The membership ranks a server supports, as advertised in `PREFIX`,
/// ordered from highest to lowest.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusModes(Vec<Membership>);

impl Default for StatusModes {
    /// Returns the usual `(qaohv)~&@%+`.
    fn default() -> Self {
        StatusModes(vec![
            Membership::FOUNDER,
            Membership::PROTECTED,
            Membership::OPERATOR,
            Membership::HALFOP,
            Membership::VOICE,
        ])
    }
}

impl std::ops::Deref for StatusModes {
    type Target = [Membership];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl StatusModes {
    /// Creates a table from ranks ordered from highest to lowest.
    pub fn new(ranks: Vec<Membership>) -> StatusModes {
        StatusModes(ranks)
    }
    /// Parses the value of a `PREFIX` token, such as `(ov)@+`.
    ///
    /// An empty value means the server supports no membership ranks at all.
    pub fn parse(value: &str) -> Result<StatusModes, ParseError> {
        if value.is_empty() {
            return Ok(StatusModes(Vec::new()));
        }
        let invalid = || ParseError::InvalidField("PREFIX", value.to_owned());
        let (modes, prefixes) =
            value.strip_prefix('(').and_then(|v| v.split_once(')')).ok_or_else(invalid)?;
        if modes.chars().count() != prefixes.chars().count() {
            return Err(invalid());
        }
        let mut ranks = Vec::with_capacity(modes.len());
        for (mode, prefix) in std::iter::zip(modes.chars(), prefixes.chars()) {
            let mode = Mode::from_char(mode).ok_or_else(invalid)?;
            ranks.push(Membership { mode, prefix });
        }
        Ok(StatusModes(ranks))
    }
    /// Returns the rank granted by `mode`.
    pub fn by_mode(&self, mode: Mode) -> Option<Membership> {
        self.0.iter().find(|m| m.mode == mode).copied()
    }
    /// Returns the rank represented by `prefix`.
    pub fn by_prefix(&self, prefix: char) -> Option<Membership> {
        self.0.iter().find(|m| m.prefix == prefix).copied()
    }
    /// Returns the mode letters of every rank.
    pub fn modes(&self) -> ModeSet {
        self.0.iter().map(|m| m.mode).collect()
    }
    /// Splits the prefix symbols off of a NAMES reply entry such as `@+nick`.
    ///
    /// Returns the ranks those symbols stand for and the rest of the entry.
    pub fn split_prefixes<'a>(&self, entry: &'a str) -> (Memberships, &'a str) {
        let mut memberships = Memberships::new();
        let mut rest = entry;
        while let Some(c) = rest.chars().next() {
            let Some(membership) = self.by_prefix(c) else {
                break;
            };
            memberships.add(self, membership);
            rest = &rest[c.len_utf8()..];
        }
        (memberships, rest)
    }
}

impl std::fmt::Display for StatusModes {
    /// Writes the table in `PREFIX` form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_char('(')?;
        for m in &self.0 {
            f.write_char(m.mode.into_char())?;
        }
        f.write_char(')')?;
        for m in &self.0 {
            f.write_char(m.prefix)?;
        }
        Ok(())
    }
}

/// The ranks one user holds in one channel.
///
/// Always ordered from highest to lowest rank,
/// following the order of the [`StatusModes`] passed to [`add`][Memberships::add].
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Memberships(Vec<Membership>);

impl std::ops::Deref for Memberships {
    type Target = [Membership];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl Memberships {
    /// Creates an empty set of ranks.
    pub const fn new() -> Memberships {
        Memberships(Vec::new())
    }
    /// Grants a rank.
    ///
    /// `available` is the ordered list of every rank the server supports.
    /// Does nothing if the rank is already held.
    pub fn add(&mut self, available: &[Membership], new: Membership) {
        // Both lists are in the same order,
        // so walk them together until new's slot is found.
        let mut idx = 0usize;
        for avail in available {
            let Some(held) = self.0.get(idx) else {
                break;
            };
            if held == avail {
                if *avail == new {
                    return;
                }
                idx += 1;
            } else if *avail == new {
                break;
            }
        }
        self.0.insert(idx, new);
    }
    /// Revokes a rank.
    ///
    /// Returns `false` if the rank was not held.
    pub fn remove(&mut self, old: Membership) -> bool {
        let Some(idx) = self.0.iter().position(|m| *m == old) else {
            return false;
        };
        self.0.remove(idx);
        true
    }
    /// Returns the highest rank held.
    pub fn highest(&self) -> Option<Membership> {
        self.0.first().copied()
    }
    /// Returns the prefix symbols for these ranks.
    ///
    /// If `multi_prefix` is false, only the symbol of the highest rank is returned.
    pub fn format(&self, multi_prefix: bool) -> String {
        if multi_prefix {
            self.0.iter().map(|m| m.prefix).collect()
        } else {
            self.highest().map(|m| m.prefix.to_string()).unwrap_or_default()
        }
    }
}
