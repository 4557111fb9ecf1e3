//! The command parser registry and the built-in `LINE` subscriber.
//!
//! Parsers are the only place protocol lines turn into state changes and
//! derived events. Each parser receives the normalized command name, the
//! optional actor prefix, and the argument rest of the line; it mutates
//! the session first and dispatches events after, so subscribers always
//! observe post-change state.

mod channel;
mod connection;
mod messaging;
mod mode;
mod whois;

use std::collections::HashMap;

use slirc_wire::numeric;

use crate::bus::Bus;
use crate::control::Controller;
use crate::event::{Event, Outcome};
use crate::state::Session;

/// A per-command line parser.
pub type ParserFn = fn(
    &mut Session,
    &mut Controller,
    &mut Bus,
    &str,
    Option<&str>,
    &str,
) -> anyhow::Result<()>;

/// A registry entry: a real parser, or an explicit no-op that still
/// claims the line so it never reaches `RAWLINE`.
#[derive(Clone, Copy)]
pub enum Parser {
    /// Parse the line.
    Handle(ParserFn),
    /// Recognized but deliberately dropped.
    Ignore,
}

/// Lookup from normalized command tokens to parsers.
///
/// Commands are keyed by name after numeric-to-mnemonic translation.
/// Users can register additional parsers or ignores; later registrations
/// for the same command replace earlier ones.
pub struct Registry {
    parsers: HashMap<&'static str, Parser>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Build the registry with all built-in parsers installed.
    pub fn new() -> Self {
        let mut registry = Registry {
            parsers: HashMap::new(),
        };

        // Connection bookkeeping
        registry.register("WELCOME", connection::welcome);
        registry.register("CREATED", connection::created);
        registry.register("MYINFO", connection::myinfo);
        registry.register("FEATURELIST", connection::featurelist);
        registry.register("NICKNAMEINUSE", connection::nick_in_use);
        registry.ignore("YOURHOST");
        registry.ignore("NONICKNAMEGIVEN");
        registry.ignore("NOMOTD");

        // Messaging
        registry.register("PRIVMSG", messaging::message);
        registry.register("NOTICE", messaging::message);
        registry.register("MOTDSTART", messaging::motd);
        registry.register("MOTD", messaging::motd);
        registry.register("ENDOFMOTD", messaging::motd);

        // Channel membership
        registry.register("JOIN", channel::join);
        registry.register("PART", channel::part);
        registry.register("KICK", channel::kick);
        registry.register("QUIT", channel::quit);
        registry.register("NICK", channel::nick);
        registry.register("TOPIC", channel::topic);
        registry.register("INVITE", channel::invite);
        registry.register("NAMREPLY", channel::namreply);
        registry.register("ENDOFNAMES", channel::endofnames);

        // Modes
        registry.register("MODE", mode::mode);

        // WHOIS sub-replies
        for cmd in [
            "WHOISUSER",
            "WHOISSERVER",
            "WHOISOPERATOR",
            "WHOISIDLE",
            "WHOISCHANNELS",
            "WHOISACCOUNT",
            "WHOISBOT",
            "WHOISREGNICK",
            "ENDOFWHOIS",
        ] {
            registry.register(cmd, whois::whois);
        }

        registry
    }

    /// Install (or replace) a parser for a command.
    pub fn register(&mut self, command: &'static str, parser: ParserFn) {
        self.parsers.insert(command, Parser::Handle(parser));
    }

    /// Mark a command as recognized but deliberately dropped.
    pub fn ignore(&mut self, command: &'static str) {
        self.parsers.insert(command, Parser::Ignore);
    }

    /// Look up the parser for a normalized command token.
    pub fn get(&self, command: &str) -> Option<Parser> {
        self.parsers.get(command).copied()
    }
}

/// The built-in `LINE` subscriber.
///
/// Answers PING inline, splits the actor prefix and command token off,
/// translates numerics, and runs the registered parser. Returns
/// [`Outcome::Pass`] for unknown commands so the bus falls through to
/// `RAWLINE`.
pub fn on_line(
    registry: &Registry,
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    event: &Event,
) -> anyhow::Result<Outcome> {
    let Event::Line(line) = event else {
        return Ok(Outcome::Pass);
    };

    // PING/PONG is pure keepalive; answer before any parsing and fire
    // nothing.
    if let Some(rest) = line.strip_prefix("PING") {
        session.send_raw(format!("PONG{rest}"));
        return Ok(Outcome::Handled);
    }

    let (actor, rest) = match line.strip_prefix(':') {
        Some(prefixed) => {
            let (actor, rest) = prefixed.split_once(' ').unwrap_or((prefixed, ""));
            (Some(actor), rest)
        }
        None => (None, line.as_str()),
    };
    let (command, args) = rest.split_once(' ').unwrap_or((rest, ""));
    let command = numeric::mnemonic(command).unwrap_or(command);

    match registry.get(command) {
        Some(Parser::Handle(parse)) => {
            parse(session, controller, bus, command, actor, args)?;
            Ok(Outcome::Handled)
        }
        Some(Parser::Ignore) => Ok(Outcome::Handled),
        None => Ok(Outcome::Pass),
    }
}
