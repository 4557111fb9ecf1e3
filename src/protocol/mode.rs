//! MODE parsing: the personal path and the channel walk.

use std::collections::BTreeSet;

use slirc_wire::Identity;
use tracing::warn;

use crate::bus::Bus;
use crate::control::Controller;
use crate::event::{Event, ModeOp};
use crate::state::{ModeValue, Session};

/// Parse a MODE line, apply each change to local state, and dispatch one
/// `MODE` event per mode letter, in order, after its change is applied.
///
/// Channel mode groups walk left to right; every argument-taking letter
/// (privilege letters plus the list/always/set CHANMODES categories)
/// consumes the next argument token strictly in order. Privilege changes
/// land on the named member; always/set categories store or drop the
/// channel mode value; toggles store a marker; list modes are announced
/// but never stored.
pub(super) fn mode(
    session: &mut Session,
    controller: &mut Controller,
    bus: &mut Bus,
    _command: &str,
    actor: Option<&str>,
    args: &str,
) -> anyhow::Result<()> {
    let actor = actor.map(Identity::parse);
    let (target, rest) = args.split_once(' ').unwrap_or((args, ""));
    let target = target.to_string();
    let rest = rest.strip_prefix(':').unwrap_or(rest);

    let chantypes = session.server.chantypes();
    let is_channel = target
        .chars()
        .next()
        .is_some_and(|c| chantypes.contains(c));

    if !is_channel {
        // Personal modes apply to our own identity.
        for group in rest.split_whitespace() {
            let mut letters = group.chars();
            let Some(op) = letters.next().and_then(ModeOp::from_char) else {
                warn!(group = %group, "skipping mode group without +/- operator");
                continue;
            };
            for letter in letters {
                match op {
                    ModeOp::Add => {
                        session.me.modes.insert(letter);
                    }
                    ModeOp::Remove => {
                        session.me.modes.remove(&letter);
                    }
                }
                bus.dispatch(
                    session,
                    controller,
                    &Event::Mode {
                        actor: actor.clone(),
                        target: target.clone(),
                        op,
                        mode: letter,
                        argument: None,
                    },
                );
            }
        }
        return Ok(());
    }

    if !session.server.has_channel(&target) {
        warn!(channel = %target, "ignoring MODE for channel we are not in");
        return Ok(());
    }
    let prefixes = session.server.prefix_map();
    let privilege: BTreeSet<char> = prefixes.letters().collect();
    let categories = session.server.chan_modes();

    let rest = rest.to_string();
    let mut tokens = rest.split_whitespace();
    while let Some(group) = tokens.next() {
        let mut letters = group.chars();
        let Some(op) = letters.next().and_then(ModeOp::from_char) else {
            warn!(group = %group, "skipping mode group without +/- operator");
            continue;
        };
        for letter in letters {
            let takes_argument =
                privilege.contains(&letter) || categories.takes_argument(letter);
            let argument = if takes_argument {
                tokens.next().map(str::to_string)
            } else {
                None
            };

            if privilege.contains(&letter) {
                match (argument.as_deref(), session.server.channel_mut(&target)) {
                    (Some(nick), Some(chan)) => match chan.member_mut(nick) {
                        Some(member) => {
                            match op {
                                ModeOp::Add => {
                                    member.modes.insert(letter);
                                }
                                ModeOp::Remove => {
                                    member.modes.remove(&letter);
                                }
                            };
                        }
                        None => {
                            warn!(channel = %target, nick = %nick, "privilege change for unknown member");
                        }
                    },
                    _ => {
                        warn!(channel = %target, mode = %letter, "privilege change without argument");
                    }
                }
            } else if let Some(chan) = session.server.channel_mut(&target) {
                match op {
                    ModeOp::Add => {
                        if categories.is_always_arg(letter) || categories.is_set_arg(letter) {
                            if let Some(argument) = argument.clone() {
                                chan.modes.insert(letter, ModeValue::Arg(argument));
                            }
                        } else if categories.is_toggle(letter) {
                            chan.modes.insert(letter, ModeValue::Set);
                        }
                        // list modes fall through unstored
                    }
                    ModeOp::Remove => {
                        if categories.is_always_arg(letter)
                            || categories.is_set_arg(letter)
                            || categories.is_toggle(letter)
                        {
                            chan.modes.remove(&letter);
                        }
                    }
                }
            }

            bus.dispatch(
                session,
                controller,
                &Event::Mode {
                    actor: actor.clone(),
                    target: target.clone(),
                    op,
                    mode: letter,
                    argument,
                },
            );
        }
    }
    Ok(())
}
