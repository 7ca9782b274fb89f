//! Casemapping rules.
//!
//! IRC networks decide for themselves which nicknames and channel names
//! are considered the same name, and advertise their choice through the
//! `CASEMAPPING` ISUPPORT token.
//! That token may arrive after state has already been collected,
//! so a casemap here is a plain value that can be swapped at runtime.


use std::borrow::Cow;

/// A name-folding rule.
///
/// Only ASCII bytes are ever mapped, and only to other ASCII bytes,
/// so mapping preserves both the length and the UTF-8 validity of a name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Casemap {
    /// No folding at all. Used until the server says otherwise.
    #[default]
    None,
    /// ASCII lowercase mapping.
    Ascii,
    /// ASCII casemapping, plus `{}\` are mapped to `[]|`.
    Rfc1459Strict,
    /// RFC-1459 strict casemapping, plus `~` is mapped to `^`.
    Rfc1459,
}

fn rfc1459_strict(byte: u8) -> u8 {
    match byte {
        b'{' => b'[',
        b'}' => b']',
        b'\\' => b'|',
        _ => byte.to_ascii_lowercase(),
    }
}

fn rfc1459(byte: u8) -> u8 {
    if byte == b'~' {
        b'^'
    } else {
        rfc1459_strict(byte)
    }
}

/// Maps every byte of `name` through `f`, borrowing if nothing changes.
///
/// `f` must map ASCII bytes to ASCII bytes and leave every other byte alone.
fn map_str(name: &str, f: impl Fn(u8) -> u8) -> Cow<'_, str> {
    let Some(idx) = name.bytes().position(|b| f(b) != b) else {
        return Cow::Borrowed(name);
    };
    // idx is the position of an ASCII byte, so it lies on a char boundary.
    let (unchanged, rest) = name.split_at(idx);
    let mut mapped = String::with_capacity(name.len());
    mapped.push_str(unchanged);
    mapped.extend(rest.chars().map(|c| if c.is_ascii() { f(c as u8) as char } else { c }));
    Cow::Owned(mapped)
}

impl Casemap {
    /// Looks up a casemap by its `CASEMAPPING` token.
    ///
    /// Only `ascii`, `rfc1459`, and `rfc1459-strict` are recognized.
    /// Returns `None` for anything else,
    /// in which case the caller should keep whatever casemap it already had.
    pub fn from_name(name: &str) -> Option<Casemap> {
        match name {
            "ascii" => Some(Casemap::Ascii),
            "rfc1459" => Some(Casemap::Rfc1459),
            "rfc1459-strict" => Some(Casemap::Rfc1459Strict),
            _ => None,
        }
    }
    /// Returns the token naming this casemap.
    pub const fn name(self) -> &'static str {
        match self {
            Casemap::None => "none",
            Casemap::Ascii => "ascii",
            Casemap::Rfc1459Strict => "rfc1459-strict",
            Casemap::Rfc1459 => "rfc1459",
        }
    }
    /// Maps a single byte.
    pub fn map_byte(self, byte: u8) -> u8 {
        match self {
            Casemap::None => byte,
            Casemap::Ascii => byte.to_ascii_lowercase(),
            Casemap::Rfc1459Strict => rfc1459_strict(byte),
            Casemap::Rfc1459 => rfc1459(byte),
        }
    }
    /// Returns the canonical form of `name`.
    pub fn map(self, name: &str) -> Cow<'_, str> {
        if self == Casemap::None {
            return Cow::Borrowed(name);
        }
        map_str(name, |b| self.map_byte(b))
    }
    /// Applies only the part of this casemap that does not concern ASCII letters.
    ///
    /// The result equals `name` except that every byte that is not an ASCII letter
    /// is replaced by the corresponding byte of `self.map(name)`.
    pub fn map_partial(self, name: &str) -> Cow<'_, str> {
        map_str(name, |b| if b.is_ascii_alphabetic() { b } else { self.map_byte(b) })
    }
    /// Tests two names for equality under this casemap.
    pub fn names_eq(self, a: &str, b: &str) -> bool {
        a.len() == b.len()
            && std::iter::zip(a.bytes(), b.bytes())
                .all(|(a, b)| self.map_byte(a) == self.map_byte(b))
    }
}

impl std::fmt::Display for Casemap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
