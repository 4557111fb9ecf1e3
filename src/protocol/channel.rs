//! Channel membership bookkeeping: JOIN, PART, KICK, QUIT, NICK, TOPIC,
//! INVITE, and the NAMES sequence.

use slirc_wire::Identity;
use tracing::warn;

use crate::bus::Bus;
use crate::control::Controller;
use crate::event::Event;
use crate::state::Session;

/// JOIN dispatches both a `JOIN` and, for someone else joining, a
/// `MEMBERS`. Our own join defers `MEMBERS` until ENDOFNAMES so the
/// roster is complete when subscribers look at it.
pub(super) fn join(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let actor = Identity::parse(actor.unwrap_or_default());
    let channel = args.trim_start_matches([' ', ':']).to_string();
    let is_me = session.is_me(actor.nick());
    if is_me {
        session.server.add_channel(&channel);
        // The server's view of our host is authoritative.
        if let Some(host) = actor.host.clone() {
            session.me.host = Some(host);
        }
    }
    let Some(chan) = session.server.channel_mut(&channel) else {
        warn!(channel = %channel, "ignoring JOIN for channel we are not in");
        return Ok(());
    };
    chan.add_member(actor.clone());
    bus.dispatch(
        session,
        controller,
        &Event::Join {
            actor,
            channel: channel.clone(),
        },
    );
    if !is_me {
        bus.dispatch(session, controller, &Event::Members { channel });
    }
    Ok(())
}

/// PART removes the member; our own part destroys the channel record and
/// emits no `MEMBERS` for it.
pub(super) fn part(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let actor = Identity::parse(actor.unwrap_or_default());
    let (channel, message) = args.split_once(" :").unwrap_or((args, ""));
    let channel = channel.trim().to_string();
    let message = message.to_string();
    let is_me = session.is_me(actor.nick());
    match session.server.channel_mut(&channel) {
        Some(chan) => {
            chan.remove_member(actor.nick());
        }
        None => {
            warn!(channel = %channel, "ignoring PART for channel we are not in");
            return Ok(());
        }
    }
    if is_me {
        session.server.remove_channel(&channel);
    }
    bus.dispatch(
        session,
        controller,
        &Event::Part {
            actor,
            channel: channel.clone(),
            message,
        },
    );
    if !is_me {
        bus.dispatch(session, controller, &Event::Members { channel });
    }
    Ok(())
}

/// KICK is a forced part; being the target destroys the channel record
/// and emits no `MEMBERS` for it.
pub(super) fn kick(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let actor = Identity::parse(actor.unwrap_or_default());
    let (front, message) = args.split_once(" :").unwrap_or((args, ""));
    let mut tokens = front.split_whitespace();
    let (Some(channel), Some(target)) = (tokens.next(), tokens.next()) else {
        warn!(args = %args, "short KICK line");
        return Ok(());
    };
    let channel = channel.to_string();
    let target = Identity::parse(target);
    let message = message.to_string();
    match session.server.channel_mut(&channel) {
        Some(chan) => {
            chan.remove_member(target.nick());
        }
        None => {
            warn!(channel = %channel, "ignoring KICK for channel we are not in");
            return Ok(());
        }
    }
    let is_me = session.is_me(target.nick());
    if is_me {
        session.server.remove_channel(&channel);
    }
    bus.dispatch(
        session,
        controller,
        &Event::Kick {
            actor,
            target,
            channel: channel.clone(),
            message,
        },
    );
    if !is_me {
        bus.dispatch(session, controller, &Event::Members { channel });
    }
    Ok(())
}

/// QUIT removes the actor from every channel they occupied, with one
/// `MEMBERS` per affected channel after the `QUIT` itself.
pub(super) fn quit(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let actor = Identity::parse(actor.unwrap_or_default());
    let message = args.split_once(':').map(|(_, m)| m).unwrap_or("").to_string();
    bus.dispatch(
        session,
        controller,
        &Event::Quit {
            actor: actor.clone(),
            message,
        },
    );
    let affected: Vec<String> = session
        .server
        .channels()
        .filter(|chan| chan.has_member(actor.nick()))
        .map(|chan| chan.name.clone())
        .collect();
    for channel in affected {
        if let Some(chan) = session.server.channel_mut(&channel) {
            chan.remove_member(actor.nick());
        }
        bus.dispatch(session, controller, &Event::Members { channel });
    }
    Ok(())
}

/// NICK re-keys the actor in every channel they occupy, preserving their
/// modes, and updates our own identity when it is us. One `MEMBERS` per
/// affected channel follows the `NICK` event.
pub(super) fn nick(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let actor = Identity::parse(actor.unwrap_or_default());
    let new_nick = args.trim().trim_start_matches(':').to_string();
    if new_nick.is_empty() {
        warn!(args = %args, "NICK with no new nick");
        return Ok(());
    }
    if session.is_me(actor.nick()) {
        session.me.set_nick(&new_nick);
    }
    let affected: Vec<String> = session
        .server
        .channels()
        .filter(|chan| chan.has_member(actor.nick()))
        .map(|chan| chan.name.clone())
        .collect();
    for channel in &affected {
        if let Some(chan) = session.server.channel_mut(channel) {
            chan.rename_member(actor.nick(), &new_nick);
        }
    }
    bus.dispatch(
        session,
        controller,
        &Event::Nick {
            actor,
            new_nick,
        },
    );
    for channel in affected {
        bus.dispatch(session, controller, &Event::Members { channel });
    }
    Ok(())
}

/// TOPIC stores the new topic (empty clears it) and dispatches.
pub(super) fn topic(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let (channel, topic) = args.split_once(" :").unwrap_or((args, ""));
    let channel = channel.trim().to_string();
    let topic = topic.to_string();
    match session.server.channel_mut(&channel) {
        Some(chan) => {
            chan.topic = if topic.is_empty() {
                None
            } else {
                Some(topic.clone())
            };
        }
        None => {
            warn!(channel = %channel, "ignoring TOPIC for channel we are not in");
            return Ok(());
        }
    }
    let actor = actor.map(Identity::parse);
    bus.dispatch(
        session,
        controller,
        &Event::Topic {
            actor,
            channel,
            topic,
        },
    );
    Ok(())
}

/// INVITE carries no state change; modules decide whether to accept.
pub(super) fn invite(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let Some(channel) = args
        .split_whitespace()
        .last()
        .map(|c| c.trim_start_matches(':').to_string())
    else {
        warn!(args = %args, "short INVITE line");
        return Ok(());
    };
    let actor = actor.map(Identity::parse);
    bus.dispatch(session, controller, &Event::Invite { actor, channel });
    Ok(())
}

/// 353: merge a NAMES page into the roster without duplicate warnings,
/// translating privilege symbols to member mode letters. No event fires;
/// 366 does that once the roster is complete.
pub(super) fn namreply(
    session: &mut Session,
    _controller: &mut Controller,
    _bus: &mut Bus,
    _command: &str,
    _actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let prefixes = session.server.prefix_map();
    let (channelinfo, names) = args.split_once(" :").unwrap_or((args, ""));
    let Some(channel) = channelinfo.split_whitespace().last() else {
        warn!(args = %args, "short NAMREPLY line");
        return Ok(());
    };
    let channel = channel.to_string();
    let Some(chan) = session.server.channel_mut(&channel) else {
        warn!(channel = %channel, "ignoring NAMREPLY for channel we are not in");
        return Ok(());
    };
    for token in names.split_whitespace() {
        let (symbols, nick) = prefixes.split_prefixes(token);
        if nick.is_empty() {
            continue;
        }
        let member = chan.merge_member(nick);
        for symbol in symbols {
            if let Some(letter) = prefixes.letter_for_symbol(symbol) {
                member.modes.insert(letter);
            }
        }
    }
    Ok(())
}

/// 366: the roster for a channel is complete.
pub(super) fn endofnames(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    _actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let front = args.split_once(" :").map(|(f, _)| f).unwrap_or(args);
    let Some(channel) = front.split_whitespace().last() else {
        warn!(args = %args, "short ENDOFNAMES line");
        return Ok(());
    };
    let channel = channel.to_string();
    bus.dispatch(session, controller, &Event::Members { channel });
    Ok(())
}
