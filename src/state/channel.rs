//! Per-channel state: roster, topic, modes.

use std::collections::HashMap;

use slirc_wire::{irc_to_lower, Identity};
use tracing::{debug, warn};

/// Stored value for one channel mode letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeValue {
    /// A toggle mode that is currently set.
    Set,
    /// An argument-taking mode with its current argument.
    Arg(String),
}

/// One channel we are currently in.
///
/// Members are keyed by case-mapped nick. List-type modes (bans and
/// friends) are never stored here; they are announced via `MODE` events
/// and forgotten.
#[derive(Debug, Clone)]
pub struct Channel {
    /// The channel name as the server spelled it.
    pub name: String,
    /// Current topic; `None` when unknown or cleared.
    pub topic: Option<String>,
    /// Non-list channel modes currently set.
    pub modes: HashMap<char, ModeValue>,
    members: HashMap<String, Identity>,
}

impl Channel {
    /// Create an empty channel record.
    pub fn new(name: impl Into<String>) -> Self {
        Channel {
            name: name.into(),
            topic: None,
            modes: HashMap::new(),
            members: HashMap::new(),
        }
    }

    /// Add a member. Adding a nick already present is a warned no-op.
    pub fn add_member(&mut self, member: Identity) {
        let key = irc_to_lower(member.nick());
        if self.members.contains_key(&key) {
            warn!(channel = %self.name, nick = %member.nick(), "ignoring duplicate member add");
            return;
        }
        debug!(channel = %self.name, nick = %member.nick(), "adding member");
        self.members.insert(key, member);
    }

    /// Remove a member by nick. Removing an absent nick is a warned no-op.
    /// Returns whether anything was removed.
    pub fn remove_member(&mut self, nick: &str) -> bool {
        if self.members.remove(&irc_to_lower(nick)).is_none() {
            warn!(channel = %self.name, nick = %nick, "ignoring removal of unknown member");
            return false;
        }
        debug!(channel = %self.name, nick = %nick, "removing member");
        true
    }

    /// Look up a member by nick (case-insensitively).
    pub fn member(&self, nick: &str) -> Option<&Identity> {
        self.members.get(&irc_to_lower(nick))
    }

    /// Mutable member lookup, for mode bookkeeping.
    pub fn member_mut(&mut self, nick: &str) -> Option<&mut Identity> {
        self.members.get_mut(&irc_to_lower(nick))
    }

    /// Whether `nick` is on this channel.
    pub fn has_member(&self, nick: &str) -> bool {
        self.members.contains_key(&irc_to_lower(nick))
    }

    /// Fetch or create the member entry for a NAMES-derived sighting.
    ///
    /// Unlike [`add_member`](Self::add_member) an existing entry is not a
    /// duplicate here; NAMES legitimately re-lists everyone.
    pub fn merge_member(&mut self, nick: &str) -> &mut Identity {
        self.members
            .entry(irc_to_lower(nick))
            .or_insert_with(|| Identity::parse(nick))
    }

    /// Re-key a member under a new nick, preserving their modes.
    /// Returns whether the old nick was present.
    pub fn rename_member(&mut self, old: &str, new: &str) -> bool {
        match self.members.remove(&irc_to_lower(old)) {
            Some(mut member) => {
                member.set_nick(new);
                self.members.insert(irc_to_lower(new), member);
                true
            }
            None => false,
        }
    }

    /// Iterate over the current members.
    pub fn members(&self) -> impl Iterator<Item = &Identity> {
        self.members.values()
    }

    /// Number of known members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_add_is_a_noop() {
        let mut chan = Channel::new("#kit");
        chan.add_member(Identity::parse("alice!a@one.example.net"));
        chan.add_member(Identity::parse("Alice"));
        assert_eq!(chan.member_count(), 1);
        // the original entry survives
        assert_eq!(
            chan.member("ALICE").and_then(|m| m.host.as_deref()),
            Some("one.example.net")
        );
    }

    #[test]
    fn remove_is_casemapped_and_tolerant() {
        let mut chan = Channel::new("#kit");
        chan.add_member(Identity::parse("Bob[1]"));
        assert!(chan.remove_member("bob{1}"));
        assert!(!chan.remove_member("bob{1}"));
        assert_eq!(chan.member_count(), 0);
    }

    #[test]
    fn rename_preserves_modes() {
        let mut chan = Channel::new("#kit");
        chan.add_member(Identity::parse("carol"));
        if let Some(m) = chan.member_mut("carol") {
            m.modes.insert('o');
        }
        assert!(chan.rename_member("carol", "carole"));
        assert!(!chan.has_member("carol"));
        let renamed = chan.member("carole").unwrap();
        assert_eq!(renamed.nick(), "carole");
        assert!(renamed.modes.contains(&'o'));
    }

    #[test]
    fn merge_member_never_warns_or_duplicates() {
        let mut chan = Channel::new("#kit");
        chan.merge_member("dave").modes.insert('v');
        chan.merge_member("DAVE");
        assert_eq!(chan.member_count(), 1);
        assert!(chan.member("dave").unwrap().modes.contains(&'v'));
    }
}
