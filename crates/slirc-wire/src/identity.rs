//! IRC actor identities.
//!
//! Everything IRC attributes to someone arrives with a hostmask of the form
//! `nick[!user]@host`, where the user and host portions are frequently
//! missing. `Identity` keeps whatever parts we have learned so far plus the
//! user modes and verification state the session layer accumulates.

use std::collections::BTreeSet;
use std::fmt;

use crate::casemap::irc_eq;

/// Sigil some networks prepend to a nick to mark it as identity-verified.
const VERIFIED_SIGIL: char = '~';

/// One IRC actor: a nick plus whatever else the server has told us.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    nick: String,
    /// The username (ident) portion of the hostmask, if known.
    pub username: Option<String>,
    /// The host portion of the hostmask, if known.
    pub host: Option<String>,
    /// Free-form real name, if known.
    pub realname: Option<String>,
    /// Accumulated user mode letters.
    pub modes: BTreeSet<char>,
    /// Whether the nick carried the services verification sigil.
    pub verified: bool,
}

impl Identity {
    /// Build an identity from a hostmask or bare nick.
    pub fn parse(hostmask: &str) -> Self {
        let mut id = Identity::default();
        id.update_from_hostmask(hostmask);
        id
    }

    /// Re-parse nick, username, and host from a hostmask.
    ///
    /// Missing portions overwrite with `None`; realname and modes are left
    /// alone. An empty user or host segment counts as missing.
    pub fn update_from_hostmask(&mut self, hostmask: &str) {
        let (front, host) = match hostmask.split_once('@') {
            Some((front, host)) if !host.is_empty() => (front, Some(host.to_string())),
            Some((front, _)) => (front, None),
            None => (hostmask, None),
        };
        let (nick, username) = match front.split_once('!') {
            Some((nick, user)) if !user.is_empty() => (nick, Some(user.to_string())),
            Some((nick, _)) => (nick, None),
            None => (front, None),
        };
        self.set_nick(nick);
        self.username = username;
        self.host = host;
    }

    /// The current nick, without any verification sigil.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Set the nick, unwrapping the verification sigil if present.
    pub fn set_nick(&mut self, nick: &str) {
        match nick.strip_prefix(VERIFIED_SIGIL) {
            Some(rest) => {
                self.verified = true;
                self.nick = rest.to_string();
            }
            None => {
                self.verified = false;
                self.nick = nick.to_string();
            }
        }
    }
}

/// Two identities are the same actor when their nicks match under the IRC
/// case map. If both hosts are known they must also match; an unknown host
/// on either side downgrades to nick-only comparison.
///
/// Deliberately not `Eq`: the host fallback makes this reflexive and
/// symmetric but not transitive.
impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        if !irc_eq(&self.nick, &other.nick) {
            return false;
        }
        match (&self.host, &other.host) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => true,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nick)?;
        if let Some(host) = &self.host {
            if let Some(user) = &self.username {
                write!(f, "!{user}")?;
            }
            write!(f, "@{host}")?;
        }
        Ok(())
    }
}
