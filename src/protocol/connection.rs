//! Registration-time replies: WELCOME, CREATED, MYINFO, FEATURELIST, and
//! the nickname-in-use error.

use slirc_wire::FeatureValue;
use tracing::warn;

use crate::bus::Bus;
use crate::control::Controller;
use crate::event::Event;
use crate::state::Session;

/// 001: registration completed. The trailing token is the hostmask the
/// server believes we have; sync our identity from it.
pub(super) fn welcome(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    _actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let hostmask = args
        .rsplit(' ')
        .next()
        .unwrap_or(args)
        .trim_start_matches(':');
    session.me.update_from_hostmask(hostmask);
    let hostmask = hostmask.to_string();
    bus.dispatch(session, controller, &Event::Welcome { hostmask });
    Ok(())
}

/// 003: "This server was created <date>".
pub(super) fn created(
    session: &mut Session,
    _controller: &mut Controller,
    _bus: &mut Bus,
    _command: &str,
    _actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    if let Some(idx) = args.find("created ") {
        session.server.created = Some(args[idx + "created ".len()..].trim().to_string());
    }
    Ok(())
}

/// 004: server name, version, and the mode alphabets.
pub(super) fn myinfo(
    session: &mut Session,
    _controller: &mut Controller,
    _bus: &mut Bus,
    _command: &str,
    _actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let mut tokens = args.split_whitespace();
    let _addressed = tokens.next();
    let (Some(host), Some(version), Some(user_modes), Some(channel_modes)) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        warn!(args = %args, "short MYINFO reply");
        return Ok(());
    };
    session.server.host = host.to_string();
    session.server.version = Some(version.to_string());
    session.server.user_modes = user_modes.chars().collect();
    session.server.channel_modes = channel_modes.chars().collect();
    Ok(())
}

/// 005: ISUPPORT tokens. Values parse opportunistically as integers; a
/// token without `=` stores empty text.
pub(super) fn featurelist(
    session: &mut Session,
    _controller: &mut Controller,
    _bus: &mut Bus,
    _command: &str,
    _actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    // Strip the trailing ":are supported by this server" and the
    // addressed nick.
    let body = match args.rfind(" :") {
        Some(idx) => &args[..idx],
        None => args,
    };
    let body = body.split_once(' ').map(|(_, rest)| rest).unwrap_or(body);
    for item in body.split_whitespace() {
        let (feature, value) = item.split_once('=').unwrap_or((item, ""));
        session
            .server
            .features
            .insert(feature.to_string(), FeatureValue::parse(value));
    }
    Ok(())
}

/// 433: our requested nick is taken. State is untouched; a module (or
/// the operator) decides what to try next.
pub(super) fn nick_in_use(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    _actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let front = args.split_once(" :").map(|(f, _)| f).unwrap_or(args);
    let nick = front.rsplit(' ').next().unwrap_or("").to_string();
    bus.dispatch(session, controller, &Event::NickInUse { nick });
    Ok(())
}
