//! State tracking for a connection to an upstream server.

mod caps;
mod msg;

pub use caps::*;
pub use msg::*;

use crate::{
    casemap::Casemap,
    channel::{ArgPolicy, ChanTypes, Channel, ChannelModes, ChannelStatus, ModeRules},
    error::ParseError,
    foldmap::FoldMap,
    membership::{Memberships, StatusModes},
    mode::{ModeSet, ModeTypes},
};
use std::collections::BTreeSet;
use std::time::{Duration, SystemTime};

/// The result of handling a message.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Handled {
    /// The message did not concern any tracked state.
    Ignored,
    /// Tracked state was updated.
    Updated,
    /// A channel's modes were updated.
    ChannelModes {
        /// The channel's name as sent in the message.
        channel: String,
        /// Indices into the message's parameters of every argument that names a member.
        ///
        /// A relay that rewrites nicknames on the way downstream needs to rewrite these.
        members: BTreeSet<usize>,
    },
}

/// The state of one connection to an IRC server.
///
/// Feed every message from the server into [`handle`][Upstream::handle].
#[derive(Clone, Debug)]
pub struct Upstream {
    nick: String,
    casemap: Casemap,
    rules: ModeRules,
    /// The server's capabilities.
    pub caps: Caps,
    /// Our own user modes.
    pub user_modes: ModeSet,
    channels: FoldMap<Channel>,
}

fn source_nick(msg: &impl Instruction) -> Result<&str, ParseError> {
    msg.source_nick().ok_or(ParseError::MissingField("source"))
}

impl Upstream {
    /// Creates state for a connection that is registering with the provided nick.
    ///
    /// No casemapping is used until the server advertises one.
    pub fn new(nick: impl Into<String>) -> Self {
        Self::with_rules(nick, ModeRules::default())
    }
    /// As [`Upstream::new`], but starts from the provided rules instead of the standard ones.
    pub fn with_rules(nick: impl Into<String>, rules: ModeRules) -> Self {
        Upstream {
            nick: nick.into(),
            casemap: Casemap::None,
            rules,
            caps: Caps::new(),
            user_modes: ModeSet::new(),
            channels: FoldMap::new(),
        }
    }
    /// Returns our current nick.
    pub fn nick(&self) -> &str {
        &self.nick
    }
    /// Returns `true` if `name` is our nick.
    pub fn is_self(&self, name: &str) -> bool {
        self.casemap.names_eq(&self.nick, name)
    }
    /// Returns the casemap in use.
    pub fn casemap(&self) -> Casemap {
        self.casemap
    }
    /// Replaces the casemap, re-indexing every channel and member.
    pub fn set_casemap(&mut self, casemap: Casemap) {
        self.casemap = casemap;
        self.channels.set_casemap(casemap);
        for channel in self.channels.values_mut() {
            channel.members.set_casemap(casemap);
        }
    }
    /// Returns the rules used to interpret mode changes.
    pub fn rules(&self) -> &ModeRules {
        &self.rules
    }
    /// Returns the channels we are in.
    pub fn channels(&self) -> &FoldMap<Channel> {
        &self.channels
    }
    /// Returns the state of a channel we are in.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }
    /// Returns the prefix symbols of a channel member,
    /// honoring whether `multi-prefix` is enabled.
    pub fn member_prefix(&self, channel: &str, nick: &str) -> Option<String> {
        let multi_prefix = self.caps.is_enabled("multi-prefix");
        self.channels.get(channel)?.member_prefix(nick, multi_prefix)
    }
    /// Updates state from one ISUPPORT token, such as `PREFIX=(ov)@+` or `-CHANMODES`.
    ///
    /// Returns `Ok(true)` if the token was recognized and state was updated.
    /// Returns `Ok(false)` if the token or, for `CASEMAPPING`, its value was not recognized,
    /// in which case nothing changes.
    /// Returns `Err` if the token was recognized but its value could not be parsed.
    pub fn apply_isupport(&mut self, token: &str) -> Result<bool, ParseError> {
        let (negated, token) = match token.strip_prefix('-') {
            Some(token) => (true, token),
            None => (false, token),
        };
        let (key, value) = token.split_once('=').unwrap_or((token, ""));
        match (key, negated) {
            // Unadvertised casemapping is rfc1459.
            ("CASEMAPPING", true) => self.set_casemap(Casemap::Rfc1459),
            ("CASEMAPPING", false) => {
                let Some(casemap) = Casemap::from_name(value) else {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(target: "lichen", "unrecognized casemapping {:?}", value);
                    return Ok(false);
                };
                self.set_casemap(casemap);
            }
            ("PREFIX", true) => self.rules.prefix = StatusModes::default(),
            ("PREFIX", false) => self.rules.prefix = StatusModes::parse(value)?,
            ("CHANMODES", true) => self.rules.chanmodes = ModeTypes::default(),
            ("CHANMODES", false) => {
                let (chanmodes, _extra) = ModeTypes::parse(value);
                #[cfg(feature = "tracing")]
                if !_extra.is_empty() {
                    tracing::debug!(target: "lichen", "ignoring CHANMODES beyond type D: {}", _extra);
                }
                self.rules.chanmodes = chanmodes;
            }
            ("CHANTYPES", true) => self.rules.chantypes = ChanTypes::default(),
            ("CHANTYPES", false) => self.rules.chantypes = ChanTypes::new(value),
            _ => return Ok(false),
        }
        Ok(true)
    }
    /// Updates state from a message sent by the server.
    pub fn handle(&mut self, msg: &impl Instruction) -> Result<Handled, ParseError> {
        let all = msg.params();
        match msg.command() {
            // RPL_WELCOME
            "001" => {
                let [nick] = msg::params(msg)?;
                self.nick = nick.to_owned();
            }
            "JOIN" => {
                let [name] = msg::params(msg)?;
                let nick = source_nick(msg)?;
                if self.is_self(nick) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(target: "lichen", "joined {}", name);
                    self.channels.insert(name, Channel::new(name, self.casemap));
                } else if let Some(channel) = self.channels.get_mut(name) {
                    channel.members.insert(nick, Memberships::new());
                } else {
                    return Ok(Handled::Ignored);
                }
            }
            "PART" => {
                let [name] = msg::params(msg)?;
                let nick = source_nick(msg)?;
                return Ok(self.remove_member(name, nick));
            }
            "KICK" => {
                let [name, nick] = msg::params(msg)?;
                return Ok(self.remove_member(name, nick));
            }
            "QUIT" => {
                let nick = source_nick(msg)?;
                for channel in self.channels.values_mut() {
                    channel.members.remove(nick);
                }
            }
            "NICK" => {
                let [new] = msg::params(msg)?;
                let old = source_nick(msg)?;
                if self.is_self(old) {
                    self.nick = new.to_owned();
                }
                for channel in self.channels.values_mut() {
                    channel.members.rename(old, new);
                }
            }
            "MODE" => {
                let [target, modes] = msg::params(msg)?;
                if self.rules.chantypes.is_channel(target) {
                    let Some(channel) = self.channels.get_mut(target) else {
                        return Ok(Handled::Ignored);
                    };
                    let members = channel.apply_modes(&self.rules, modes, &all[2..])?;
                    return Ok(Handled::ChannelModes {
                        channel: target.to_owned(),
                        members: members.into_iter().map(|i| i + 2).collect(),
                    });
                } else if self.is_self(target) {
                    self.user_modes.apply(modes)?;
                } else {
                    return Ok(Handled::Ignored);
                }
            }
            "TOPIC" => {
                let [name, topic] = msg::params(msg)?;
                let Some(channel) = self.channels.get_mut(name) else {
                    return Ok(Handled::Ignored);
                };
                channel.topic = Some(topic.to_owned()).filter(|t| !t.is_empty());
                channel.topic_setter = msg.source().map(str::to_owned);
                channel.topic_time = Some(SystemTime::now());
            }
            // RPL_ISUPPORT
            "005" => {
                // The first parameter is our nick and the last is "are supported".
                let tokens = all.get(1..all.len().saturating_sub(1)).unwrap_or_default();
                for token in tokens {
                    if let Err(_e) = self.apply_isupport(token) {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(target: "lichen", "bad ISUPPORT token {:?}: {}", token, _e);
                    }
                }
            }
            // RPL_UMODEIS
            "221" => {
                let [_, modes] = msg::params(msg)?;
                self.user_modes = ModeSet::new();
                self.user_modes.apply(modes)?;
            }
            // RPL_CHANNELMODEIS
            "324" => {
                let [_, name, modes] = msg::params(msg)?;
                let Some(channel) = self.channels.get_mut(name) else {
                    return Ok(Handled::Ignored);
                };
                channel.modes = Some(ChannelModes::new());
                let members =
                    channel.apply_modes_with(&self.rules, modes, &all[3..], ArgPolicy::Redacted)?;
                return Ok(Handled::ChannelModes {
                    channel: name.to_owned(),
                    members: members.into_iter().map(|i| i + 3).collect(),
                });
            }
            // RPL_CREATIONTIME
            "329" => {
                let [_, name, time] = msg::params(msg)?;
                let Some(channel) = self.channels.get_mut(name) else {
                    return Ok(Handled::Ignored);
                };
                channel.creation_time = Some(time.to_owned());
            }
            // RPL_NOTOPIC
            "331" => {
                let [_, name] = msg::params(msg)?;
                let Some(channel) = self.channels.get_mut(name) else {
                    return Ok(Handled::Ignored);
                };
                channel.topic = None;
                channel.topic_setter = None;
                channel.topic_time = None;
            }
            // RPL_TOPIC
            "332" => {
                let [_, name, topic] = msg::params(msg)?;
                let Some(channel) = self.channels.get_mut(name) else {
                    return Ok(Handled::Ignored);
                };
                channel.topic = Some(topic.to_owned()).filter(|t| !t.is_empty());
            }
            // RPL_TOPICWHOTIME
            "333" => {
                let [_, name, setter, time] = msg::params(msg)?;
                let secs: u64 = time
                    .parse()
                    .map_err(|_| ParseError::InvalidField("topic time", time.to_owned()))?;
                let Some(channel) = self.channels.get_mut(name) else {
                    return Ok(Handled::Ignored);
                };
                channel.topic_setter = Some(setter.to_owned());
                channel.topic_time = Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
            }
            // RPL_NAMREPLY
            "353" => {
                let [_, status, name, names] = msg::params(msg)?;
                let Some(channel) = self.channels.get_mut(name) else {
                    return Ok(Handled::Ignored);
                };
                // Once complete, NAMES replies are answers to someone else's query.
                if channel.complete {
                    return Ok(Handled::Ignored);
                }
                channel.status = Some(ChannelStatus::parse(status)?);
                for entry in names.split(' ').filter(|e| !e.is_empty()) {
                    let (memberships, rest) = self.rules.prefix.split_prefixes(entry);
                    // userhost-in-names
                    let nick = rest.split('!').next().unwrap_or(rest);
                    channel.members.insert(nick, memberships);
                }
            }
            // RPL_ENDOFNAMES
            "366" => {
                let [_, name] = msg::params(msg)?;
                let Some(channel) = self.channels.get_mut(name) else {
                    return Ok(Handled::Ignored);
                };
                channel.complete = true;
            }
            "CAP" => {
                let [_, subcmd, _] = msg::params(msg)?;
                let caps = all.last().map(String::as_str).unwrap_or_default();
                let caps = caps.split(' ').filter(|c| !c.is_empty());
                match subcmd {
                    "LS" | "NEW" => {
                        for cap in caps {
                            let (cap, value) = cap.split_once('=').unwrap_or((cap, ""));
                            self.caps.add(cap, value);
                        }
                    }
                    "ACK" => {
                        for cap in caps {
                            match cap.strip_prefix('-') {
                                Some(cap) => self.caps.set_enabled(cap, false),
                                None => self.caps.set_enabled(cap, true),
                            }
                        }
                    }
                    "DEL" => {
                        for cap in caps {
                            self.caps.del(cap);
                        }
                    }
                    _ => return Ok(Handled::Ignored),
                }
            }
            _ => return Ok(Handled::Ignored),
        }
        Ok(Handled::Updated)
    }
    fn remove_member(&mut self, channel: &str, nick: &str) -> Handled {
        if self.is_self(nick) {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "lichen", "left {}", channel);
            if self.channels.remove(channel).is_none() {
                return Handled::Ignored;
            }
        } else {
            let Some(channel) = self.channels.get_mut(channel) else {
                return Handled::Ignored;
            };
            channel.members.remove(nick);
        }
        Handled::Updated
    }
}
