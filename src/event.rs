//! Events fanned out on the dispatch bus.

use std::fmt;

use slirc_wire::Identity;

use crate::state::WhoisReply;

/// Direction of a mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOp {
    /// The mode was set (`+`).
    Add,
    /// The mode was unset (`-`).
    Remove,
}

impl ModeOp {
    /// The `+`/`-` operator for a mode group character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(ModeOp::Add),
            '-' => Some(ModeOp::Remove),
            _ => None,
        }
    }

    /// The wire character for this direction.
    pub fn symbol(self) -> char {
        match self {
            ModeOp::Add => '+',
            ModeOp::Remove => '-',
        }
    }
}

impl fmt::Display for ModeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Where a PRIVMSG or NOTICE was addressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Recipient {
    /// Sent to a channel we can see.
    Channel(String),
    /// Sent directly to a user (usually us).
    User(Identity),
}

/// One protocol event with its typed payload.
///
/// Events are ephemeral: they are built for a single dispatch, handed to
/// subscribers by reference, and dropped. Anything a module wants to keep
/// it must clone out.
#[derive(Debug, Clone)]
pub enum Event {
    /// The transport is up. The built-in subscriber performs registration.
    Connected,
    /// The module population has been (re)started.
    Startup,
    /// A complete line arrived off the wire.
    Line(String),
    /// A line no parser claimed.
    RawLine(String),
    /// Registration completed (001).
    Welcome {
        /// The hostmask the server believes we have.
        hostmask: String,
    },
    /// The full message of the day, after ENDOFMOTD.
    Motd {
        /// MOTD body with lines joined by `\n`.
        text: String,
    },
    /// A PRIVMSG addressed to a channel or to us.
    Privmsg {
        /// Sender, if the line carried a prefix.
        actor: Option<Identity>,
        /// Channel or user the message was addressed to.
        recipient: Recipient,
        /// Message body.
        text: String,
    },
    /// A NOTICE addressed to a channel or to us.
    Notice {
        /// Sender, if the line carried a prefix.
        actor: Option<Identity>,
        /// Channel or user the notice was addressed to.
        recipient: Recipient,
        /// Notice body.
        text: String,
    },
    /// Someone (possibly us) joined a channel.
    Join {
        /// Who joined.
        actor: Identity,
        /// The channel joined.
        channel: String,
    },
    /// Someone (possibly us) left a channel.
    Part {
        /// Who left.
        actor: Identity,
        /// The channel left.
        channel: String,
        /// Part message, possibly empty.
        message: String,
    },
    /// Someone was kicked from a channel.
    Kick {
        /// Who did the kicking.
        actor: Identity,
        /// Who was kicked.
        target: Identity,
        /// The channel involved.
        channel: String,
        /// Kick message, possibly empty.
        message: String,
    },
    /// Someone quit the network.
    Quit {
        /// Who quit.
        actor: Identity,
        /// Quit message, possibly empty.
        message: String,
    },
    /// Someone (possibly us) changed nick.
    Nick {
        /// The identity under its old nick.
        actor: Identity,
        /// The new nick.
        new_nick: String,
    },
    /// A channel's member list changed or finished synchronizing.
    Members {
        /// The channel whose roster changed.
        channel: String,
    },
    /// A channel topic changed.
    Topic {
        /// Who changed it, if the line carried a prefix.
        actor: Option<Identity>,
        /// The channel involved.
        channel: String,
        /// The new topic; empty means cleared.
        topic: String,
    },
    /// We were invited to a channel.
    Invite {
        /// Who invited us, if the line carried a prefix.
        actor: Option<Identity>,
        /// The channel we were invited to.
        channel: String,
    },
    /// One mode change, after it has been applied to local state.
    Mode {
        /// Who changed it, if the line carried a prefix.
        actor: Option<Identity>,
        /// The channel or nick the change applies to.
        target: String,
        /// Set or unset.
        op: ModeOp,
        /// The mode letter.
        mode: char,
        /// The consumed argument, if the letter takes one.
        argument: Option<String>,
    },
    /// The server rejected our nick as taken (433).
    NickInUse {
        /// The nick that was in use.
        nick: String,
    },
    /// A complete WHOIS response, after ENDOFWHOIS.
    Whois(WhoisReply),
}

impl Event {
    /// The registration key for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Connected => EventKind::Connected,
            Event::Startup => EventKind::Startup,
            Event::Line(_) => EventKind::Line,
            Event::RawLine(_) => EventKind::RawLine,
            Event::Welcome { .. } => EventKind::Welcome,
            Event::Motd { .. } => EventKind::Motd,
            Event::Privmsg { .. } => EventKind::Privmsg,
            Event::Notice { .. } => EventKind::Notice,
            Event::Join { .. } => EventKind::Join,
            Event::Part { .. } => EventKind::Part,
            Event::Kick { .. } => EventKind::Kick,
            Event::Quit { .. } => EventKind::Quit,
            Event::Nick { .. } => EventKind::Nick,
            Event::Members { .. } => EventKind::Members,
            Event::Topic { .. } => EventKind::Topic,
            Event::Invite { .. } => EventKind::Invite,
            Event::Mode { .. } => EventKind::Mode,
            Event::NickInUse { .. } => EventKind::NickInUse,
            Event::Whois(_) => EventKind::Whois,
        }
    }
}

/// Hashable registration key for one event family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum EventKind {
    Connected,
    Startup,
    Line,
    RawLine,
    Welcome,
    Motd,
    Privmsg,
    Notice,
    Join,
    Part,
    Kick,
    Quit,
    Nick,
    Members,
    Topic,
    Invite,
    Mode,
    NickInUse,
    Whois,
}

impl EventKind {
    /// Every event kind the engine itself can produce.
    pub const ALL: &'static [EventKind] = &[
        EventKind::Connected,
        EventKind::Startup,
        EventKind::Line,
        EventKind::RawLine,
        EventKind::Welcome,
        EventKind::Motd,
        EventKind::Privmsg,
        EventKind::Notice,
        EventKind::Join,
        EventKind::Part,
        EventKind::Kick,
        EventKind::Quit,
        EventKind::Nick,
        EventKind::Members,
        EventKind::Topic,
        EventKind::Invite,
        EventKind::Mode,
        EventKind::NickInUse,
        EventKind::Whois,
    ];

    /// The conventional uppercase name, mostly for log output.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Connected => "CONNECTED",
            EventKind::Startup => "STARTUP",
            EventKind::Line => "LINE",
            EventKind::RawLine => "RAWLINE",
            EventKind::Welcome => "WELCOME",
            EventKind::Motd => "MOTD",
            EventKind::Privmsg => "PRIVMSG",
            EventKind::Notice => "NOTICE",
            EventKind::Join => "JOIN",
            EventKind::Part => "PART",
            EventKind::Kick => "KICK",
            EventKind::Quit => "QUIT",
            EventKind::Nick => "NICK",
            EventKind::Members => "MEMBERS",
            EventKind::Topic => "TOPIC",
            EventKind::Invite => "INVITE",
            EventKind::Mode => "MODE",
            EventKind::NickInUse => "NICKNAMEINUSE",
            EventKind::Whois => "WHOIS",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a subscriber decided about an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Consume the event; later subscribers do not see it.
    Handled,
    /// Let the event continue to later subscribers.
    Pass,
}

impl Outcome {
    /// Whether this outcome suppresses further handling.
    pub fn is_handled(self) -> bool {
        matches!(self, Outcome::Handled)
    }
}
