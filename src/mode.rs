//! Mode letters, sets of modes, and mode argument rules.

#[cfg(test)]
mod tests;

use crate::error::{ModeError, ParseError};
use std::{fmt::Write, iter::FusedIterator, num::NonZeroU8};

/// A single mode letter.
///
/// This is a newtype around an ASCII alphabetic character.
/// It orders alphabetically first and by capitalization second,
/// so `r < R < s`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "char", into = "char"))]
pub struct Mode(NonZeroU8);

impl Mode {
    /// Creates a new `Mode` from the given ASCII letter.
    pub const fn new(letter: u8) -> Option<Mode> {
        if letter.is_ascii_alphabetic() {
            Some(unsafe { Self::new_unchecked(letter) })
        } else {
            None
        }
    }
    /// Creates a new `Mode` from the given ASCII letter with no validity checks.
    ///
    /// # Safety
    /// The letter must be an ASCII alphabetic character.
    /// Undefined behavior may result otherwise.
    pub const unsafe fn new_unchecked(letter: u8) -> Mode {
        Mode(NonZeroU8::new_unchecked(letter))
    }
    /// Creates a new `Mode` from the given `char`.
    pub fn from_char(letter: char) -> Option<Mode> {
        u8::try_from(letter).ok().and_then(Mode::new)
    }
    /// Returns the letter as a byte.
    pub const fn as_u8(self) -> u8 {
        self.0.get()
    }
    /// Converts `self` into a `char`.
    pub const fn into_char(self) -> char {
        self.0.get() as char
    }
    // a = 0, A = 1, b = 2, ...
    const fn index(self) -> u32 {
        let raw = self.0.get();
        ((raw | 0x20) - b'a') as u32 * 2 + (raw < b'a') as u32
    }
    const fn mask(self) -> u64 {
        1u64 << self.index()
    }
    fn from_index(index: u32) -> Mode {
        debug_assert!(index < 52);
        let letter = b'a' + (index >> 1) as u8;
        let letter = if index & 1 == 1 { letter.to_ascii_uppercase() } else { letter };
        // Safety: index < 52, so letter is in a..=z or A..=Z.
        unsafe { Mode::new_unchecked(letter) }
    }
}

impl std::cmp::PartialOrd for Mode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for Mode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index().cmp(&other.index())
    }
}

impl std::fmt::Debug for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.into_char().fmt(f)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char(self.into_char())
    }
}

impl From<Mode> for char {
    fn from(value: Mode) -> Self {
        value.into_char()
    }
}

impl From<Mode> for u8 {
    fn from(value: Mode) -> Self {
        value.as_u8()
    }
}

impl TryFrom<char> for Mode {
    type Error = ParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Mode::from_char(value).ok_or_else(|| ParseError::InvalidField("mode", value.to_string()))
    }
}

/// A set of (non-list) modes, such as a user's own user modes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ModeSet(u64);

impl ModeSet {
    /// Creates a new, empty `ModeSet`.
    pub const fn new() -> ModeSet {
        ModeSet(0)
    }
    /// Returns a version of `self` with the provided mode set.
    pub const fn with(self, mode: Mode) -> ModeSet {
        ModeSet(self.0 | mode.mask())
    }
    /// Creates a set containing every ASCII letter of `letters`.
    ///
    /// Non-letters are ignored.
    pub fn from_letters(letters: &str) -> ModeSet {
        letters.bytes().filter_map(Mode::new).collect()
    }
    /// Sets a mode.
    ///
    /// Returns `true` if there was a change.
    #[inline]
    pub fn set(&mut self, mode: Mode) -> bool {
        let old = self.0;
        self.0 |= mode.mask();
        old != self.0
    }
    /// Unsets a mode.
    ///
    /// Returns `true` if there was a change.
    #[inline]
    pub fn unset(&mut self, mode: Mode) -> bool {
        let old = self.0;
        self.0 &= !mode.mask();
        old != self.0
    }
    /// Tests if a mode is set.
    pub const fn contains(&self, mode: Mode) -> bool {
        (self.0 & mode.mask()) != 0
    }
    /// Returns true if this set is empty.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
    /// Returns the number of modes in this set.
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
    /// Returns the modes in either set.
    pub const fn union(self, other: ModeSet) -> ModeSet {
        ModeSet(self.0 | other.0)
    }
    /// Returns the modes in `self` but not in `other`.
    pub const fn difference(self, other: ModeSet) -> ModeSet {
        ModeSet(self.0 & !other.0)
    }
    /// Applies a mode string such as `+iw-x` to this set.
    ///
    /// Bytes that are not ASCII letters are ignored.
    /// On error, changes made by the part of the string before the error are kept.
    pub fn apply(&mut self, modes: &str) -> Result<(), ModeError> {
        let mut sign = None;
        for byte in modes.bytes() {
            match byte {
                b'+' => sign = Some(true),
                b'-' => sign = Some(false),
                _ => {
                    let Some(set) = sign else {
                        return Err(ModeError::MissingSign { modes: modes.to_owned() });
                    };
                    let Some(mode) = Mode::new(byte) else {
                        continue;
                    };
                    if set {
                        self.set(mode);
                    } else {
                        self.unset(mode);
                    }
                }
            }
        }
        Ok(())
    }
    /// Iterates over the modes in this set in [`Mode`] order.
    pub fn iter(&self) -> ModeSetIter {
        ModeSetIter(self.0)
    }
}

impl IntoIterator for ModeSet {
    type Item = Mode;

    type IntoIter = ModeSetIter;

    fn into_iter(self) -> Self::IntoIter {
        ModeSetIter(self.0)
    }
}

impl IntoIterator for &ModeSet {
    type Item = Mode;

    type IntoIter = ModeSetIter;

    fn into_iter(self) -> Self::IntoIter {
        ModeSetIter(self.0)
    }
}

impl FromIterator<Mode> for ModeSet {
    fn from_iter<T: IntoIterator<Item = Mode>>(iter: T) -> Self {
        let mut ms = ModeSet::new();
        for mode in iter {
            ms.set(mode);
        }
        ms
    }
}

impl std::fmt::Debug for ModeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self).finish()
    }
}

impl std::fmt::Display for ModeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for mode in self {
            f.write_char(mode.into_char())?;
        }
        Ok(())
    }
}

impl From<ModeSet> for String {
    fn from(value: ModeSet) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ModeSet {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if let Some(bad) = value.bytes().find(|b| !b.is_ascii_alphabetic()) {
            return Err(ParseError::InvalidField("mode", char::from(bad).to_string()));
        }
        Ok(ModeSet::from_letters(&value))
    }
}

/// Iterator over [`ModeSet`]s.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSetIter(u64);

impl Iterator for ModeSetIter {
    type Item = Mode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let mode = Mode::from_index(self.0.trailing_zeros());
        self.0 &= !mode.mask();
        Some(mode)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let retval = self.0.count_ones() as usize;
        (retval, Some(retval))
    }
}

impl DoubleEndedIterator for ModeSetIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let mode = Mode::from_index(63 - self.0.leading_zeros());
        self.0 &= !mode.mask();
        Some(mode)
    }
}

impl FusedIterator for ModeSetIter {}
impl ExactSizeIterator for ModeSetIter {}

/// How a channel mode consumes arguments.
///
/// See <https://modern.ircdocs.horse/#mode-message>.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub enum ModeType {
    /// Adds or removes an entry of a list. Always takes an argument.
    A,
    /// Changes a setting. Always takes an argument.
    B,
    /// Changes a setting. Takes an argument only when set.
    C,
    /// Changes a setting. Never takes an argument.
    D,
}

impl ModeType {
    /// Returns `true` if a mode of this type takes an argument
    /// when being set (`set == true`) or unset.
    pub const fn takes_arg(self, set: bool) -> bool {
        match self {
            ModeType::A | ModeType::B => true,
            ModeType::C => set,
            ModeType::D => false,
        }
    }
}

macro_rules! modes {
    ($($letter:literal)*) => {
        ModeSet::new()$(.with(unsafe { Mode::new_unchecked($letter) }))*
    };
}

/// The argument rules of every known channel mode, as advertised in `CHANMODES`.
///
/// Membership modes (from `PREFIX`) are not part of this table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct ModeTypes {
    a: ModeSet,
    b: ModeSet,
    c: ModeSet,
    d: ModeSet,
}

impl Default for ModeTypes {
    /// Returns the standard table, `beI,k,l,imnst`.
    fn default() -> Self {
        ModeTypes::STANDARD
    }
}

impl ModeTypes {
    /// The standard channel modes: `beI,k,l,imnst`.
    pub const STANDARD: ModeTypes = ModeTypes {
        a: modes!(b'b' b'e' b'I'),
        b: modes!(b'k'),
        c: modes!(b'l'),
        d: modes!(b'i' b'm' b'n' b's' b't'),
    };
    /// Creates a table that knows no modes.
    pub const fn empty() -> ModeTypes {
        ModeTypes { a: ModeSet::new(), b: ModeSet::new(), c: ModeSet::new(), d: ModeSet::new() }
    }
    /// Parses the value of a `CHANMODES` token, such as `beI,k,l,imnst`.
    ///
    /// Returns the table and the letters of any groups past the fourth,
    /// whose argument rules are unknown.
    /// A letter listed in more than one group keeps its last classification.
    pub fn parse(value: &str) -> (ModeTypes, ModeSet) {
        let mut retval = ModeTypes::empty();
        let mut extra = ModeSet::new();
        for (group, letters) in value.split(',').enumerate() {
            let ty = match group {
                0 => ModeType::A,
                1 => ModeType::B,
                2 => ModeType::C,
                3 => ModeType::D,
                _ => {
                    extra = extra.union(ModeSet::from_letters(letters));
                    continue;
                }
            };
            for mode in ModeSet::from_letters(letters) {
                retval.insert(mode, ty);
            }
        }
        (retval, extra.difference(retval.all()))
    }
    /// Returns the argument rules for `mode`, or `None` if it is unknown.
    pub fn get(&self, mode: Mode) -> Option<ModeType> {
        if self.a.contains(mode) {
            Some(ModeType::A)
        } else if self.b.contains(mode) {
            Some(ModeType::B)
        } else if self.c.contains(mode) {
            Some(ModeType::C)
        } else if self.d.contains(mode) {
            Some(ModeType::D)
        } else {
            None
        }
    }
    /// Sets the argument rules for `mode`, returning the old ones.
    pub fn insert(&mut self, mode: Mode, ty: ModeType) -> Option<ModeType> {
        let old = self.remove(mode);
        match ty {
            ModeType::A => self.a.set(mode),
            ModeType::B => self.b.set(mode),
            ModeType::C => self.c.set(mode),
            ModeType::D => self.d.set(mode),
        };
        old
    }
    /// Forgets `mode`, returning its old argument rules.
    pub fn remove(&mut self, mode: Mode) -> Option<ModeType> {
        let old = self.get(mode);
        for set in [&mut self.a, &mut self.b, &mut self.c, &mut self.d] {
            set.unset(mode);
        }
        old
    }
    /// Returns every mode of the given type.
    pub const fn of_type(&self, ty: ModeType) -> ModeSet {
        match ty {
            ModeType::A => self.a,
            ModeType::B => self.b,
            ModeType::C => self.c,
            ModeType::D => self.d,
        }
    }
    /// Returns every known mode.
    pub const fn all(&self) -> ModeSet {
        self.a.union(self.b).union(self.c).union(self.d)
    }
}

impl std::fmt::Display for ModeTypes {
    /// Writes the table in `CHANMODES` form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.a, self.b, self.c, self.d)
    }
}
