//! Shared helpers for driving scripted sessions through the engine.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use slirc_client::{Client, Config, Event, EventKind, Outcome};

/// A config for a bot named `kit` on irc.example.net.
pub fn test_config(extra: &str) -> Config {
    let raw = format!(
        r#"
[server]
host = "irc.example.net"
nick = "kit"

{extra}
"#
    );
    toml::from_str(&raw).expect("test config must parse")
}

/// A client plus an event log capturing chosen kinds off the bus.
pub struct Harness {
    pub client: Client,
    pub log: Rc<RefCell<Vec<Event>>>,
}

impl Harness {
    /// Build a harness capturing `kinds`, with `extra` TOML appended to
    /// the base config.
    pub fn new(extra: &str, kinds: &[EventKind]) -> Self {
        let mut client = Client::new(test_config(extra));
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in kinds {
            let sink = Rc::clone(&log);
            client.bus.on(
                *kind,
                Box::new(move |_, _, _, event| {
                    sink.borrow_mut().push(event.clone());
                    Ok(Outcome::Pass)
                }),
            );
        }
        Harness { client, log }
    }

    /// Feed a batch of server lines.
    pub fn feed(&mut self, lines: &[&str]) {
        for line in lines {
            self.client.feed_line(line);
        }
    }

    /// Take the captured events, clearing the log.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.log.borrow_mut().drain(..).collect()
    }

    /// Count captured events of one kind, without clearing.
    pub fn count(&self, kind: EventKind) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|ev| ev.kind() == kind)
            .count()
    }

    /// Everything the session queued for the wire.
    pub fn outgoing(&mut self) -> Vec<String> {
        self.client.session.take_outgoing()
    }
}

/// Walk a freshly welcomed session: registration burst up to the 005
/// advertising standard PREFIX and CHANMODES.
pub fn welcome_burst(harness: &mut Harness) {
    harness.feed(&[
        ":irc.example.net 001 kit :Welcome to ExampleNet kit!kit@client.example.com",
        ":irc.example.net 002 kit :Your host is irc.example.net, running version slircd-1.0",
        ":irc.example.net 003 kit :This server was created Jan 1 2026",
        ":irc.example.net 004 kit irc.example.net slircd-1.0 iowx beIiklmnopstv",
        ":irc.example.net 005 kit CHANTYPES=# PREFIX=(ov)@+ CHANMODES=b,k,l,imnpst NICKLEN=30 :are supported by this server",
    ]);
}
