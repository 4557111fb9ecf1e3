//! PRIVMSG, NOTICE, and the MOTD sequence.

use slirc_wire::Identity;

use crate::bus::Bus;
use crate::control::Controller;
use crate::event::{Event, Recipient};
use crate::state::Session;

fn resolve_recipient(session: &Session, raw: &str) -> Recipient {
    let chantypes = session.server.chantypes();
    let is_channel = raw.chars().next().is_some_and(|c| chantypes.contains(c));
    if is_channel {
        Recipient::Channel(raw.to_string())
    } else {
        Recipient::User(Identity::parse(raw))
    }
}

/// Shared parser for PRIVMSG and NOTICE.
pub(super) fn message(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    command: &str,
    actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let (recipient, text) = args.split_once(" :").unwrap_or((args, ""));
    let actor = actor.map(Identity::parse);
    let recipient = resolve_recipient(session, recipient);
    let text = text.to_string();
    let event = if command == "PRIVMSG" {
        Event::Privmsg {
            actor,
            recipient,
            text,
        }
    } else {
        Event::Notice {
            actor,
            recipient,
            text,
        }
    };
    bus.dispatch(session, controller, &event);
    Ok(())
}

/// Shared parser for the MOTDSTART / MOTD / ENDOFMOTD sequence.
///
/// Lines accumulate between the markers; only ENDOFMOTD dispatches, with
/// the joined body.
pub(super) fn motd(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    command: &str,
    _actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    match command {
        "MOTDSTART" => session.server.motd_reset(),
        "MOTD" => {
            let text = args.split_once(':').map(|(_, t)| t).unwrap_or("");
            session.server.motd_push(text);
        }
        _ => {
            let text = session.server.motd_finish();
            bus.dispatch(session, controller, &Event::Motd { text });
        }
    }
    Ok(())
}
