//! The live session: server state, our identity, and the outgoing queue.

use std::collections::VecDeque;

use slirc_wire::{irc_eq, Identity};
use tracing::{debug, error, info, warn};

use super::Server;

/// One IRC session.
///
/// Outgoing lines are queued here and drained by the run loop (or by
/// tests); nothing in this type touches the network.
pub struct Session {
    /// Server-side state.
    pub server: Server,
    /// Our own identity as far as we know it.
    pub me: Identity,
    outgoing: VecDeque<String>,
    stop: bool,
}

impl Session {
    /// Create a session for a connection target.
    pub fn new(host: &str, port: u16) -> Self {
        Session {
            server: Server::new(host, port),
            me: Identity::default(),
            outgoing: VecDeque::new(),
            stop: false,
        }
    }

    /// Whether `nick` is us, under the IRC case map.
    pub fn is_me(&self, nick: &str) -> bool {
        irc_eq(nick, self.me.nick())
    }

    /// Queue one raw line for the server.
    ///
    /// Lines containing CR or LF are refused with a logged error; a module
    /// echoing untrusted text must not be able to smuggle commands.
    pub fn send_raw(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.contains('\n') || line.contains('\r') {
            error!(?line, "refusing to send line with embedded newline");
            return;
        }
        debug!(server = %self.server.original_host, line = %line, "<--");
        self.outgoing.push_back(line);
    }

    /// Queue a command built from space-joined parts.
    pub fn send(&mut self, parts: &[&str]) {
        self.send_raw(parts.join(" "));
    }

    /// Send a PRIVMSG.
    pub fn privmsg(&mut self, target: &str, text: &str) {
        self.send(&["PRIVMSG", target, &format!(":{text}")]);
    }

    /// Send a NOTICE.
    pub fn notice(&mut self, target: &str, text: &str) {
        self.send(&["NOTICE", target, &format!(":{text}")]);
    }

    /// Request a nick change.
    pub fn change_nick(&mut self, nick: &str) {
        info!(nick = %nick, "requesting nick");
        self.send(&["NICK", nick]);
    }

    /// Send USER registration and remember the values locally.
    pub fn userinfo(&mut self, username: &str, realname: Option<&str>) {
        let realname = realname.unwrap_or(username);
        info!(username = %username, realname = %realname, "registering user info");
        self.send(&["USER", username, "0", "*", &format!(":{realname}")]);
        self.me.username = Some(username.to_string());
        self.me.realname = Some(realname.to_string());
    }

    /// Ask to join a channel, optionally with a key.
    ///
    /// Targets that do not start with an advertised channel prefix, and
    /// channels we are already in, are refused with a warning.
    pub fn join(&mut self, channel: &str, key: Option<&str>) {
        let chantypes = self.server.chantypes();
        let is_channel = channel
            .chars()
            .next()
            .is_some_and(|c| chantypes.contains(c));
        if !is_channel {
            warn!(target = %channel, "refusing to join non-channel target");
            return;
        }
        if self.server.has_channel(channel) {
            warn!(channel = %channel, "ignoring join for channel we are already in");
            return;
        }
        info!(channel = %channel, "joining");
        match key {
            Some(key) => self.send(&["JOIN", channel, key]),
            None => self.send(&["JOIN", channel]),
        }
    }

    /// Ask to leave a channel. Channels we are not in are refused with a
    /// warning.
    pub fn part(&mut self, channel: &str, message: Option<&str>) {
        if !self.server.has_channel(channel) {
            warn!(channel = %channel, "ignoring part for channel we are not in");
            return;
        }
        info!(channel = %channel, "parting");
        match message {
            Some(message) => self.send(&["PART", channel, &format!(":{message}")]),
            None => self.send(&["PART", channel]),
        }
    }

    /// Send WHOIS for a nick.
    pub fn whois(&mut self, nick: &str) {
        self.send(&["WHOIS", nick]);
    }

    /// Send QUIT and flag the run loop to stop once the queue drains.
    pub fn disconnect(&mut self, message: &str) {
        info!(message = %message, "disconnecting");
        self.stop = true;
        self.send(&["QUIT", &format!(":{message}")]);
    }

    /// Whether `disconnect` has been called.
    pub fn stop_requested(&self) -> bool {
        self.stop
    }

    /// Take everything queued for the wire, oldest first.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        self.outgoing.drain(..).collect()
    }
}
