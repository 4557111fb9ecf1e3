//! The client: session, bus, controller, and the run loop.

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use anyhow::Context as _;
use futures_util::{SinkExt, StreamExt};
use tokio_util::codec::Framed;
use tracing::{debug, info};

use slirc_wire::LineCodec;

use crate::bus::Bus;
use crate::config::Config;
use crate::control::Controller;
use crate::event::{Event, EventKind, Outcome};
use crate::protocol::{self, Registry};
use crate::state::Session;
use crate::transport::{self, Transport};

/// An IRC client.
///
/// Owns the session state, the dispatch bus, the module controller, and
/// the parser registry, and wires in the two built-in subscribers: one on
/// `CONNECTED` that performs NICK/USER registration, and one on `LINE`
/// that runs the protocol parsers.
///
/// Everything except [`connect`](Self::connect) and [`run`](Self::run)
/// works without a network; tests drive the whole engine through
/// [`feed_line`](Self::feed_line).
pub struct Client {
    /// The live session state.
    pub session: Session,
    /// The event dispatch bus.
    pub bus: Bus,
    /// The module controller.
    pub controller: Controller,
    registry: Rc<RefCell<Registry>>,
    connection: Option<Framed<Transport, LineCodec>>,
}

impl Client {
    /// Build a client from a configuration.
    pub fn new(config: Config) -> Self {
        let mut session = Session::new(&config.server.host, config.server.port);
        session.me.set_nick(&config.server.nick);
        session.me.username = config
            .server
            .username
            .clone()
            .or_else(|| Some(config.server.nick.clone()));
        session.me.realname = config.server.realname.clone();

        let mut bus = Bus::new();
        for kind in EventKind::ALL {
            bus.declare(*kind);
        }
        bus.on(EventKind::Connected, Box::new(on_connected));

        let registry = Rc::new(RefCell::new(Registry::new()));
        let shared = Rc::clone(&registry);
        bus.on(
            EventKind::Line,
            Box::new(move |session, controller, bus, event| {
                let registry = shared.borrow();
                protocol::on_line(&registry, session, controller, bus, event)
            }),
        );

        Client {
            session,
            bus,
            controller: Controller::new(config),
            registry,
            connection: None,
        }
    }

    /// The parser registry, for registering extra commands or ignores.
    pub fn registry_mut(&self) -> RefMut<'_, Registry> {
        self.registry.borrow_mut()
    }

    /// Dispatch an event through the bus. Returns whether a subscriber
    /// suppressed it.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        self.bus
            .dispatch(&mut self.session, &mut self.controller, event)
    }

    /// Feed one already-framed line through the engine.
    ///
    /// This is the synchronous entry the run loop uses for every decoded
    /// line, and the one tests drive scripted sessions through.
    pub fn feed_line(&mut self, line: &str) -> bool {
        debug!(server = %self.session.server.original_host, line = %line, "-->");
        self.dispatch(&Event::Line(line.to_string()))
    }

    /// (Re)load the configured modules and begin dispatching to them.
    ///
    /// Returns whether every configured module loaded.
    pub fn start_modules(&mut self) -> bool {
        let ok = self
            .controller
            .reload_all(&mut self.session, &mut self.bus);
        self.controller.start(&mut self.session, &mut self.bus);
        ok
    }

    /// Establish the transport and fire `CONNECTED`.
    ///
    /// A configured password is written straight to the connection rather
    /// than through the session queue, keeping it out of the outgoing
    /// debug log.
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        let server = self.controller.config().server.clone();
        info!(host = %server.host, port = server.port, tls = server.tls, "connecting");
        let transport = transport::connect(&server.host, server.port, server.tls).await?;
        let mut connection = Framed::new(transport, LineCodec::new());
        if let Some(password) = server.password {
            info!("sending server password");
            connection.send(format!("PASS {password}")).await?;
            self.session.server.password = Some(password);
        }
        self.connection = Some(connection);
        self.dispatch(&Event::Connected);
        self.flush().await?;
        Ok(())
    }

    async fn flush(&mut self) -> anyhow::Result<()> {
        let Some(connection) = self.connection.as_mut() else {
            return Ok(());
        };
        for line in self.session.take_outgoing() {
            connection.send(line).await?;
        }
        Ok(())
    }

    /// The read-dispatch-flush loop.
    ///
    /// Runs until [`Session::disconnect`] sets the stop flag, the server
    /// closes the connection, or the transport errors. The line being
    /// dispatched always completes before the stop flag is observed.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        while !self.session.stop_requested() {
            let next = {
                let connection = self.connection.as_mut().context("not connected")?;
                connection.next().await
            };
            match next {
                Some(Ok(line)) => {
                    self.feed_line(&line);
                    self.flush().await?;
                }
                Some(Err(err)) => return Err(err.into()),
                None => {
                    info!("connection closed by server");
                    break;
                }
            }
        }
        // Drain the farewell QUIT, if disconnect queued one.
        self.flush().await?;
        if let Some(mut connection) = self.connection.take() {
            let _ = connection.close().await;
        }
        Ok(())
    }
}

/// Built-in `CONNECTED` subscriber: request our nick and register user
/// info, per the configuration the session was built from.
fn on_connected(
    session: &mut Session,
    _controller: &mut Controller,
    _bus: &mut Bus,
    _event: &Event,
) -> anyhow::Result<Outcome> {
    let nick = session.me.nick().to_string();
    session.change_nick(&nick);
    let username = session.me.username.clone().unwrap_or_else(|| nick.clone());
    let realname = session.me.realname.clone();
    session.userinfo(&username, realname.as_deref());
    Ok(Outcome::Pass)
}
