//! The WHOIS sub-reply family.
//!
//! Sub-replies accumulate into the single buffer on [`Server`]; a
//! sub-reply for a different nick discards whatever was there. Only
//! ENDOFWHOIS dispatches, publishing the finished struct.
//!
//! [`Server`]: crate::state::Server

use slirc_wire::irc_eq;

use crate::bus::Bus;
use crate::control::Controller;
use crate::event::Event;
use crate::state::{Server, Session, WhoisChannel, WhoisReply};

fn buffer<'a>(server: &'a mut Server, nick: &str) -> &'a mut WhoisReply {
    let stale = server
        .whois
        .as_ref()
        .is_some_and(|reply| !irc_eq(&reply.nick, nick));
    if stale {
        server.whois = None;
    }
    server.whois.get_or_insert_with(|| WhoisReply::new(nick))
}

/// Shared parser for every WHOIS sub-reply and ENDOFWHOIS.
pub(super) fn whois(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    command: &str,
    _actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    if command == "ENDOFWHOIS" {
        if let Some(reply) = session.server.whois.take() {
            bus.dispatch(session, controller, &Event::Whois(reply));
        }
        return Ok(());
    }

    // Every sub-reply is "<us> <subject> <rest...>".
    let mut parts = args.splitn(3, ' ');
    let (Some(_addressed), Some(nick)) = (parts.next(), parts.next()) else {
        return Ok(());
    };
    let rest = parts.next().unwrap_or("");
    let prefixes = session.server.prefix_map();
    let entry = buffer(&mut session.server, nick);

    match command {
        "WHOISUSER" => {
            let (front, realname) = rest.split_once(" :").unwrap_or((rest, ""));
            let mut tokens = front.split_whitespace();
            entry.username = tokens.next().map(str::to_string);
            entry.host = tokens.next().map(str::to_string);
            if !realname.is_empty() {
                entry.realname = Some(realname.to_string());
            }
        }
        "WHOISSERVER" => {
            let (server, info) = rest.split_once(" :").unwrap_or((rest, ""));
            if !server.is_empty() {
                entry.server = Some(server.to_string());
            }
            if !info.is_empty() {
                entry.server_info = Some(info.to_string());
            }
        }
        "WHOISOPERATOR" => entry.operator = true,
        "WHOISIDLE" => {
            let front = rest.split_once(" :").map(|(f, _)| f).unwrap_or(rest);
            let mut tokens = front.split_whitespace();
            entry.idle_secs = tokens.next().and_then(|t| t.parse().ok());
            entry.signon = tokens.next().and_then(|t| t.parse().ok());
        }
        "WHOISCHANNELS" => {
            let list = rest.strip_prefix(':').unwrap_or(rest);
            for token in list.split_whitespace() {
                let (symbols, name) = prefixes.split_prefixes(token);
                if name.is_empty() {
                    continue;
                }
                entry.channels.push(WhoisChannel {
                    name: name.to_string(),
                    privilege: symbols.first().copied(),
                });
            }
        }
        "WHOISACCOUNT" => {
            entry.account = rest.split_whitespace().next().map(str::to_string);
        }
        "WHOISBOT" => entry.bot = true,
        "WHOISREGNICK" => entry.registered = true,
        _ => {}
    }
    Ok(())
}
