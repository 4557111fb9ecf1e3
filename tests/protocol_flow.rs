//! Scripted-session tests for the protocol engine: registration, PING,
//! messaging, membership, NAMES, MODE, and WHOIS.

mod common;

use common::{welcome_burst, Harness};
use slirc_client::wire::FeatureValue;
use slirc_client::{Event, EventKind, ModeOp, ModeValue, Recipient};

#[test]
fn ping_is_answered_inline_with_no_events() {
    let mut h = Harness::new("", &[EventKind::Line, EventKind::RawLine]);
    h.client.feed_line("PING :irc.example.net");
    assert_eq!(h.outgoing(), vec!["PONG :irc.example.net".to_string()]);
    // suppressed before RAWLINE, and the extra LINE subscriber (added
    // after the built-in parser) never saw it either
    assert_eq!(h.count(EventKind::RawLine), 0);
    assert_eq!(h.count(EventKind::Line), 0);
}

#[test]
fn welcome_burst_populates_server_state() {
    let mut h = Harness::new("", &[EventKind::Welcome]);
    welcome_burst(&mut h);

    let session = &h.client.session;
    assert_eq!(session.me.nick(), "kit");
    assert_eq!(session.me.host.as_deref(), Some("client.example.com"));
    assert_eq!(session.server.host, "irc.example.net");
    assert_eq!(session.server.original_host, "irc.example.net");
    assert_eq!(session.server.version.as_deref(), Some("slircd-1.0"));
    assert_eq!(session.server.created.as_deref(), Some("Jan 1 2026"));
    assert!(session.server.user_modes.contains(&'w'));
    assert!(session.server.channel_modes.contains(&'t'));
    assert_eq!(
        session.server.features.get("NICKLEN"),
        Some(&FeatureValue::Int(30))
    );
    assert_eq!(
        session.server.features.get("CHANTYPES"),
        Some(&FeatureValue::Text("#".to_string()))
    );

    let events = h.take_events();
    assert!(matches!(
        events.as_slice(),
        [Event::Welcome { hostmask }] if hostmask == "kit!kit@client.example.com"
    ));
}

#[test]
fn unknown_commands_fall_through_to_rawline() {
    let mut h = Harness::new("", &[EventKind::RawLine]);
    h.client.feed_line(":irc.example.net 999 kit :mystery");
    h.client.feed_line("BLORT :who knows");
    // known-but-ignored numerics do not fall through
    h.client.feed_line(":irc.example.net 002 kit :Your host");
    let raw: Vec<String> = h
        .take_events()
        .into_iter()
        .filter_map(|ev| match ev {
            Event::RawLine(line) => Some(line),
            _ => None,
        })
        .collect();
    assert_eq!(
        raw,
        vec![
            ":irc.example.net 999 kit :mystery".to_string(),
            "BLORT :who knows".to_string()
        ]
    );
}

#[test]
fn privmsg_splits_on_first_space_colon_and_resolves_recipient() {
    let mut h = Harness::new("", &[EventKind::Privmsg, EventKind::Notice]);
    welcome_burst(&mut h);
    h.client
        .feed_line(":alice!a@host PRIVMSG #kit :hello there :) : colons");
    h.client.feed_line(":alice!a@host NOTICE kit :psst");

    let events = h.take_events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::Privmsg {
            actor,
            recipient,
            text,
        } => {
            assert_eq!(actor.as_ref().map(|a| a.nick()), Some("alice"));
            assert_eq!(recipient, &Recipient::Channel("#kit".to_string()));
            assert_eq!(text, "hello there :) : colons");
        }
        other => panic!("expected PRIVMSG event, got {other:?}"),
    }
    match &events[1] {
        Event::Notice { recipient, .. } => {
            assert!(matches!(recipient, Recipient::User(id) if id.nick() == "kit"));
        }
        other => panic!("expected NOTICE event, got {other:?}"),
    }
}

#[test]
fn motd_accumulates_and_fires_once() {
    let mut h = Harness::new("", &[EventKind::Motd]);
    welcome_burst(&mut h);
    h.feed(&[
        ":irc.example.net 375 kit :- irc.example.net Message of the day -",
        ":irc.example.net 372 kit :- welcome to examplenet",
        ":irc.example.net 372 kit :- be kind",
        ":irc.example.net 376 kit :End of /MOTD command.",
    ]);
    let events = h.take_events();
    assert!(matches!(
        events.as_slice(),
        [Event::Motd { text }] if text == "- welcome to examplenet\n- be kind"
    ));
    assert_eq!(h.client.session.server.motd, "- welcome to examplenet\n- be kind");
}

#[test]
fn self_join_defers_members_until_endofnames() {
    let mut h = Harness::new("", &[EventKind::Join, EventKind::Members]);
    welcome_burst(&mut h);

    h.client.feed_line(":kit!kit@client.example.com JOIN :#kit");
    assert_eq!(h.count(EventKind::Join), 1);
    assert_eq!(h.count(EventKind::Members), 0);

    h.feed(&[
        ":irc.example.net 353 kit = #kit :kit @alice +bob carol",
        ":irc.example.net 353 kit = #kit :dave",
        ":irc.example.net 366 kit #kit :End of /NAMES list.",
    ]);
    assert_eq!(h.count(EventKind::Members), 1);

    let chan = h.client.session.server.channel("#kit").unwrap();
    assert_eq!(chan.member_count(), 5);
    assert!(chan.member("alice").unwrap().modes.contains(&'o'));
    assert!(chan.member("bob").unwrap().modes.contains(&'v'));
    assert!(chan.member("carol").unwrap().modes.is_empty());
}

#[test]
fn other_join_fires_members_immediately() {
    let mut h = Harness::new("", &[EventKind::Members]);
    welcome_burst(&mut h);
    h.feed(&[
        ":kit!kit@client.example.com JOIN :#kit",
        ":irc.example.net 366 kit #kit :End of /NAMES list.",
    ]);
    h.take_events();

    h.client.feed_line(":eve!e@host JOIN :#kit");
    assert_eq!(h.count(EventKind::Members), 1);
    assert!(h.client.session.server.channel("#kit").unwrap().has_member("eve"));
}

#[test]
fn duplicate_self_join_changes_nothing() {
    let mut h = Harness::new("", &[EventKind::Members]);
    welcome_burst(&mut h);
    h.feed(&[
        ":kit!kit@client.example.com JOIN :#kit",
        ":irc.example.net 353 kit = #kit :kit alice",
        ":irc.example.net 366 kit #kit :End of /NAMES list.",
    ]);
    h.take_events();

    h.client.feed_line(":kit!kit@client.example.com JOIN :#kit");
    assert_eq!(h.client.session.server.channels().count(), 1);
    assert_eq!(
        h.client.session.server.channel("#kit").unwrap().member_count(),
        2
    );
    assert_eq!(h.count(EventKind::Members), 0);
}

#[test]
fn self_part_destroys_channel_without_members_event() {
    let mut h = Harness::new("", &[EventKind::Part, EventKind::Members]);
    welcome_burst(&mut h);
    h.feed(&[
        ":kit!kit@client.example.com JOIN :#kit",
        ":irc.example.net 366 kit #kit :End of /NAMES list.",
    ]);
    h.take_events();

    h.client.feed_line(":kit!kit@client.example.com PART #kit :bye");
    assert!(h.client.session.server.channel("#kit").is_none());
    assert_eq!(h.count(EventKind::Part), 1);
    assert_eq!(h.count(EventKind::Members), 0);
}

#[test]
fn kick_of_us_destroys_channel_kick_of_other_updates_roster() {
    let mut h = Harness::new("", &[EventKind::Kick, EventKind::Members]);
    welcome_burst(&mut h);
    h.feed(&[
        ":kit!kit@client.example.com JOIN :#kit",
        ":irc.example.net 353 kit = #kit :kit @alice bob",
        ":irc.example.net 366 kit #kit :End of /NAMES list.",
    ]);
    h.take_events();

    h.client.feed_line(":alice!a@host KICK #kit bob :begone");
    assert_eq!(h.count(EventKind::Kick), 1);
    assert_eq!(h.count(EventKind::Members), 1);
    assert!(!h.client.session.server.channel("#kit").unwrap().has_member("bob"));
    let events = h.take_events();
    assert!(events.iter().any(|ev| matches!(
        ev,
        Event::Kick { actor, target, message, .. }
            if actor.nick() == "alice" && target.nick() == "bob" && message == "begone"
    )));

    h.client.feed_line(":alice!a@host KICK #kit kit :you too");
    assert!(h.client.session.server.channel("#kit").is_none());
    assert_eq!(h.count(EventKind::Members), 0);
}

#[test]
fn quit_and_nick_touch_every_occupied_channel() {
    let mut h = Harness::new("", &[EventKind::Members, EventKind::Nick, EventKind::Quit]);
    welcome_burst(&mut h);
    h.feed(&[
        ":kit!kit@client.example.com JOIN :#one",
        ":irc.example.net 353 kit = #one :kit @walter",
        ":irc.example.net 366 kit #one :End of /NAMES list.",
        ":kit!kit@client.example.com JOIN :#two",
        ":irc.example.net 353 kit = #two :kit walter bob",
        ":irc.example.net 366 kit #two :End of /NAMES list.",
    ]);
    h.take_events();

    // rename reaches both channels and preserves modes
    h.client.feed_line(":walter!w@host NICK :wally");
    assert_eq!(h.count(EventKind::Nick), 1);
    assert_eq!(h.count(EventKind::Members), 2);
    let one = h.client.session.server.channel("#one").unwrap();
    assert!(!one.has_member("walter"));
    assert!(one.member("wally").unwrap().modes.contains(&'o'));
    assert!(h.client.session.server.channel("#two").unwrap().has_member("wally"));
    h.take_events();

    // quit removes from both, with one MEMBERS each
    h.client.feed_line(":wally!w@host QUIT :gone fishing");
    assert_eq!(h.count(EventKind::Quit), 1);
    assert_eq!(h.count(EventKind::Members), 2);
    assert!(!h.client.session.server.channel("#one").unwrap().has_member("wally"));
    assert!(!h.client.session.server.channel("#two").unwrap().has_member("wally"));
    // bob is untouched
    assert!(h.client.session.server.channel("#two").unwrap().has_member("bob"));
}

#[test]
fn our_own_nick_change_updates_identity_and_rosters() {
    let mut h = Harness::new("", &[EventKind::Nick]);
    welcome_burst(&mut h);
    h.feed(&[
        ":kit!kit@client.example.com JOIN :#kit",
        ":irc.example.net 366 kit #kit :End of /NAMES list.",
    ]);

    h.client.feed_line(":kit!kit@client.example.com NICK :kat");
    assert_eq!(h.client.session.me.nick(), "kat");
    let chan = h.client.session.server.channel("#kit").unwrap();
    assert!(chan.has_member("kat"));
    assert!(!chan.has_member("kit"));
}

#[test]
fn topic_updates_state_and_clears_on_empty() {
    let mut h = Harness::new("", &[EventKind::Topic]);
    welcome_burst(&mut h);
    h.feed(&[
        ":kit!kit@client.example.com JOIN :#kit",
        ":irc.example.net 366 kit #kit :End of /NAMES list.",
    ]);

    h.client.feed_line(":alice!a@host TOPIC #kit :all things kit");
    assert_eq!(
        h.client.session.server.channel("#kit").unwrap().topic.as_deref(),
        Some("all things kit")
    );
    h.client.feed_line(":alice!a@host TOPIC #kit :");
    assert_eq!(h.client.session.server.channel("#kit").unwrap().topic, None);
    assert_eq!(h.count(EventKind::Topic), 2);
}

#[test]
fn mode_walk_consumes_arguments_in_order() {
    let mut h = Harness::new("", &[EventKind::Mode]);
    welcome_burst(&mut h);
    h.feed(&[
        ":kit!kit@client.example.com JOIN :#kit",
        ":irc.example.net 353 kit = #kit :kit alice bob",
        ":irc.example.net 366 kit #kit :End of /NAMES list.",
    ]);

    h.client
        .feed_line(":oper!o@host MODE #kit +obl alice *!*@bad.host 50");

    let chan = h.client.session.server.channel("#kit").unwrap();
    assert!(chan.member("alice").unwrap().modes.contains(&'o'));
    // list mode announced but never stored
    assert!(!chan.modes.contains_key(&'b'));
    assert_eq!(chan.modes.get(&'l'), Some(&ModeValue::Arg("50".to_string())));

    let events = h.take_events();
    let modes: Vec<(ModeOp, char, Option<String>)> = events
        .into_iter()
        .filter_map(|ev| match ev {
            Event::Mode {
                op, mode, argument, ..
            } => Some((op, mode, argument)),
            _ => None,
        })
        .collect();
    assert_eq!(
        modes,
        vec![
            (ModeOp::Add, 'o', Some("alice".to_string())),
            (ModeOp::Add, 'b', Some("*!*@bad.host".to_string())),
            (ModeOp::Add, 'l', Some("50".to_string())),
        ]
    );
}

#[test]
fn mode_toggles_set_and_unset() {
    let mut h = Harness::new("", &[EventKind::Mode]);
    welcome_burst(&mut h);
    h.feed(&[
        ":kit!kit@client.example.com JOIN :#kit",
        ":irc.example.net 366 kit #kit :End of /NAMES list.",
    ]);

    h.client.feed_line(":oper!o@host MODE #kit +nt");
    {
        let chan = h.client.session.server.channel("#kit").unwrap();
        assert_eq!(chan.modes.get(&'n'), Some(&ModeValue::Set));
        assert_eq!(chan.modes.get(&'t'), Some(&ModeValue::Set));
    }
    h.client.feed_line(":oper!o@host MODE #kit -t");
    let chan = h.client.session.server.channel("#kit").unwrap();
    assert!(chan.modes.contains_key(&'n'));
    assert!(!chan.modes.contains_key(&'t'));
}

#[test]
fn personal_modes_land_on_our_identity() {
    let mut h = Harness::new("", &[EventKind::Mode]);
    welcome_burst(&mut h);
    h.client.feed_line(":kit!kit@client.example.com MODE kit :+iw");
    assert!(h.client.session.me.modes.contains(&'i'));
    assert!(h.client.session.me.modes.contains(&'w'));
    h.client.feed_line(":kit!kit@client.example.com MODE kit :-w");
    assert!(!h.client.session.me.modes.contains(&'w'));
    assert_eq!(h.count(EventKind::Mode), 3);
}

#[test]
fn nick_in_use_fires_event_with_taken_nick() {
    let mut h = Harness::new("", &[EventKind::NickInUse]);
    h.client
        .feed_line(":irc.example.net 433 * kit :Nickname is already in use.");
    let events = h.take_events();
    assert!(matches!(
        events.as_slice(),
        [Event::NickInUse { nick }] if nick == "kit"
    ));
}

#[test]
fn whois_accumulates_and_publishes_on_end() {
    let mut h = Harness::new("", &[EventKind::Whois]);
    welcome_burst(&mut h);
    h.feed(&[
        ":irc.example.net 311 kit alice a host.example.net * :Alice Liddell",
        ":irc.example.net 319 kit alice :@#one +#two #three",
        ":irc.example.net 312 kit alice irc.example.net :ExampleNet server",
        ":irc.example.net 317 kit alice 42 1700000000 :seconds idle, signon time",
        ":irc.example.net 330 kit alice alice :is logged in as",
    ]);
    // nothing published until ENDOFWHOIS
    assert_eq!(h.count(EventKind::Whois), 0);

    h.client
        .feed_line(":irc.example.net 318 kit alice :End of /WHOIS list.");
    let events = h.take_events();
    let [Event::Whois(reply)] = events.as_slice() else {
        panic!("expected one WHOIS event, got {events:?}");
    };
    assert_eq!(reply.nick, "alice");
    assert_eq!(reply.username.as_deref(), Some("a"));
    assert_eq!(reply.host.as_deref(), Some("host.example.net"));
    assert_eq!(reply.realname.as_deref(), Some("Alice Liddell"));
    assert_eq!(reply.server.as_deref(), Some("irc.example.net"));
    assert_eq!(reply.idle_secs, Some(42));
    assert_eq!(reply.signon, Some(1_700_000_000));
    assert_eq!(reply.account.as_deref(), Some("alice"));
    assert_eq!(reply.channels.len(), 3);
    assert_eq!(reply.channels[0].name, "#one");
    assert_eq!(reply.channels[0].privilege, Some('@'));
    assert_eq!(reply.channels[2].privilege, None);
    // buffer is consumed
    assert_eq!(h.count(EventKind::Whois), 0);
}

#[test]
fn whois_buffer_resets_on_a_different_nick() {
    let mut h = Harness::new("", &[EventKind::Whois]);
    welcome_burst(&mut h);
    h.feed(&[
        ":irc.example.net 311 kit alice a host.example.net * :Alice Liddell",
        ":irc.example.net 313 kit bob :is an IRC operator",
        ":irc.example.net 318 kit bob :End of /WHOIS list.",
    ]);
    let events = h.take_events();
    let [Event::Whois(reply)] = events.as_slice() else {
        panic!("expected one WHOIS event, got {events:?}");
    };
    assert_eq!(reply.nick, "bob");
    assert!(reply.operator);
    // nothing of alice's survived the reset
    assert_eq!(reply.username, None);
}

#[test]
fn invite_is_dispatched_with_channel() {
    let mut h = Harness::new("", &[EventKind::Invite]);
    welcome_burst(&mut h);
    h.client.feed_line(":alice!a@host INVITE kit :#secret");
    let events = h.take_events();
    assert!(matches!(
        events.as_slice(),
        [Event::Invite { actor: Some(actor), channel }]
            if actor.nick() == "alice" && channel == "#secret"
    ));
}
