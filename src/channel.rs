//! Channel state and channel mode changes.


use crate::{
    casemap::Casemap,
    error::{ModeError, ParseError},
    foldmap::FoldMap,
    membership::{Memberships, StatusModes},
    mode::{Mode, ModeType, ModeTypes},
};
use std::collections::{BTreeSet, HashMap};
use std::time::SystemTime;

/// The modes currently set on a channel, with their arguments.
///
/// Modes that take no argument map to an empty string.
/// List modes (type A) are never stored here.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ChannelModes(HashMap<Mode, String>);

impl ChannelModes {
    /// Creates an empty table.
    pub fn new() -> ChannelModes {
        ChannelModes(HashMap::new())
    }
    /// Returns the argument of `mode` if it is set.
    pub fn get(&self, mode: Mode) -> Option<&str> {
        self.0.get(&mode).map(String::as_str)
    }
    /// Returns `true` if `mode` is set.
    pub fn contains(&self, mode: Mode) -> bool {
        self.0.contains_key(&mode)
    }
    /// Sets `mode` with the provided argument, returning the old one.
    pub fn set(&mut self, mode: Mode, arg: impl Into<String>) -> Option<String> {
        self.0.insert(mode, arg.into())
    }
    /// Unsets `mode`, returning its argument.
    pub fn unset(&mut self, mode: Mode) -> Option<String> {
        self.0.remove(&mode)
    }
    /// Returns the number of modes set.
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Returns `true` if no modes are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Iterates over set modes and their arguments in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Mode, &str)> + '_ {
        self.0.iter().map(|(m, a)| (*m, a.as_str()))
    }
    /// Returns a mode string and argument list that would set every mode in this table,
    /// as sent in `RPL_CHANNELMODEIS`.
    ///
    /// Modes with non-empty arguments come first,
    /// and the arguments are in the same order as their modes.
    pub fn format(&self) -> (String, Vec<String>) {
        let mut with_args = String::new();
        let mut without_args = String::new();
        let mut args = Vec::new();
        for (mode, arg) in &self.0 {
            if arg.is_empty() {
                without_args.push(mode.into_char());
            } else {
                with_args.push(mode.into_char());
                args.push(arg.clone());
            }
        }
        let mut modes = String::with_capacity(1 + with_args.len() + without_args.len());
        modes.push('+');
        modes.push_str(&with_args);
        modes.push_str(&without_args);
        (modes, args)
    }
}

/// The visibility of a channel as reported in `RPL_NAMREPLY`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ChannelStatus {
    /// `=`
    Public,
    /// `@`
    Secret,
    /// `*`
    Private,
}

impl ChannelStatus {
    /// Parses a channel status marker.
    pub fn parse(value: &str) -> Result<ChannelStatus, ParseError> {
        let mut chars = value.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(if value.is_empty() {
                ParseError::MissingField("channel status")
            } else {
                ParseError::InvalidField("channel status", value.to_owned())
            });
        };
        match c {
            '=' => Ok(ChannelStatus::Public),
            '@' => Ok(ChannelStatus::Secret),
            '*' => Ok(ChannelStatus::Private),
            _ => Err(ParseError::InvalidField("channel status", value.to_owned())),
        }
    }
    /// Returns the marker for this status.
    pub const fn as_char(self) -> char {
        match self {
            ChannelStatus::Public => '=',
            ChannelStatus::Secret => '@',
            ChannelStatus::Private => '*',
        }
    }
}

impl std::str::FromStr for ChannelStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelStatus::parse(s)
    }
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        f.write_char(self.as_char())
    }
}

/// The characters that begin channel names, as advertised in `CHANTYPES`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChanTypes(String);

impl Default for ChanTypes {
    fn default() -> Self {
        ChanTypes(ChanTypes::STANDARD.to_owned())
    }
}

impl ChanTypes {
    /// The standard channel types.
    pub const STANDARD: &'static str = "#&+!";
    /// Creates a set of channel types from the value of a `CHANTYPES` token.
    pub fn new(value: impl Into<String>) -> ChanTypes {
        ChanTypes(value.into())
    }
    /// Returns `true` if `name` is a channel name.
    pub fn is_channel(&self, name: &str) -> bool {
        name.chars().next().is_some_and(|c| self.0.contains(c))
    }
    /// Returns the channel type characters.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The server-advertised rules that mode changes are interpreted with.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModeRules {
    /// Membership ranks (`PREFIX`).
    pub prefix: StatusModes,
    /// Argument rules for other channel modes (`CHANMODES`).
    pub chanmodes: ModeTypes,
    /// Channel name prefixes (`CHANTYPES`).
    pub chantypes: ChanTypes,
}

/// What to do when a mode that needs an argument has none left.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ArgPolicy {
    /// Fail with [`ModeError::MissingArg`]. Used for `MODE` messages.
    #[default]
    Strict,
    /// Store an empty argument.
    ///
    /// Servers may omit sensitive arguments such as channel keys from `RPL_CHANNELMODEIS`.
    Redacted,
}

/// The state of one channel.
#[derive(Clone, Debug)]
pub struct Channel {
    /// The channel's name.
    pub name: String,
    /// The topic, if any.
    pub topic: Option<String>,
    /// Who set the topic.
    pub topic_setter: Option<String>,
    /// When the topic was set.
    pub topic_time: Option<SystemTime>,
    /// The channel's visibility, once known.
    pub status: Option<ChannelStatus>,
    /// The channel creation time as sent by the server.
    pub creation_time: Option<String>,
    /// The channel's modes.
    ///
    /// `None` if modes are not being tracked,
    /// in which case mode changes still update memberships.
    pub modes: Option<ChannelModes>,
    /// Members and their ranks.
    pub members: FoldMap<Memberships>,
    /// Whether the initial member list (`RPL_ENDOFNAMES`) has been received.
    pub complete: bool,
}

impl Channel {
    /// Creates a new channel with no known members and no mode tracking.
    pub fn new(name: impl Into<String>, casemap: Casemap) -> Channel {
        Channel {
            name: name.into(),
            topic: None,
            topic_setter: None,
            topic_time: None,
            status: None,
            creation_time: None,
            modes: None,
            members: FoldMap::with_casemap(casemap),
            complete: false,
        }
    }
    /// Applies a mode change from a `MODE` message.
    ///
    /// `modes` is the mode string and `args` are the mode arguments following it.
    /// Returns the indices into `args` of every argument that names a member.
    ///
    /// On error, changes made by the part of the string before the error are kept.
    pub fn apply_modes<S: AsRef<str>>(
        &mut self,
        rules: &ModeRules,
        modes: &str,
        args: &[S],
    ) -> Result<BTreeSet<usize>, ModeError> {
        self.apply_modes_with(rules, modes, args, ArgPolicy::Strict)
    }
    /// Applies a mode change, with control over missing arguments.
    ///
    /// See [`Channel::apply_modes`].
    pub fn apply_modes_with<S: AsRef<str>>(
        &mut self,
        rules: &ModeRules,
        modes: &str,
        args: &[S],
        policy: ArgPolicy,
    ) -> Result<BTreeSet<usize>, ModeError> {
        let Channel { name: _name, modes: table, members, .. } = self;
        let mut table = table.as_mut();
        let mut members_args = BTreeSet::new();
        let mut args_iter = args.iter().map(AsRef::as_ref).enumerate();
        let missing = |set: bool, mode: Mode| ModeError::MissingArg {
            modes: modes.to_owned(),
            set,
            mode,
        };
        let mut sign = None;
        for byte in modes.bytes() {
            let set = match byte {
                b'+' => {
                    sign = Some(true);
                    continue;
                }
                b'-' => {
                    sign = Some(false);
                    continue;
                }
                _ => sign.ok_or_else(|| ModeError::MissingSign { modes: modes.to_owned() })?,
            };
            let Some(mode) = Mode::new(byte) else {
                #[cfg(feature = "tracing")]
                tracing::debug!(target: "lichen", "ignoring non-letter mode {:?}", byte as char);
                continue;
            };
            if let Some(membership) = rules.prefix.by_mode(mode) {
                let (idx, nick) = args_iter.next().ok_or_else(|| missing(set, mode))?;
                if let Some(member) = members.get_mut(nick) {
                    if set {
                        member.add(&rules.prefix, membership);
                    } else {
                        member.remove(membership);
                    }
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        target: "lichen",
                        "{}{} for {} who is not a known member of {}",
                        if set { '+' } else { '-' },
                        mode,
                        nick,
                        _name
                    );
                }
                members_args.insert(idx);
                continue;
            }
            let Some(ty) = rules.chanmodes.get(mode) else {
                #[cfg(feature = "tracing")]
                tracing::debug!(target: "lichen", "ignoring unknown channel mode {}", mode);
                continue;
            };
            match (ty, set) {
                (ModeType::A, _) => {
                    args_iter.next();
                }
                (ModeType::B | ModeType::C, true) => {
                    let arg = match (args_iter.next(), policy) {
                        (Some((_, arg)), _) => arg,
                        (None, ArgPolicy::Redacted) => "",
                        (None, ArgPolicy::Strict) => return Err(missing(set, mode)),
                    };
                    if let Some(table) = table.as_deref_mut() {
                        table.set(mode, arg);
                    }
                }
                (ModeType::B, false) => {
                    args_iter.next();
                    if let Some(table) = table.as_deref_mut() {
                        table.unset(mode);
                    }
                }
                (ModeType::C, false) | (ModeType::D, false) => {
                    if let Some(table) = table.as_deref_mut() {
                        table.unset(mode);
                    }
                }
                (ModeType::D, true) => {
                    if let Some(table) = table.as_deref_mut() {
                        table.set(mode, "");
                    }
                }
            }
        }
        Ok(members_args)
    }
    /// Returns the prefix symbols for a member, or `None` if they are not a member.
    pub fn member_prefix(&self, nick: &str, multi_prefix: bool) -> Option<String> {
        self.members.get(nick).map(|m| m.format(multi_prefix))
    }
}
