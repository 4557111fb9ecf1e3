//! # slirc-client
//!
//! A library for building IRC clients and bots. It keeps a live model of
//! an IRC session (server features, channels, members, modes) from the
//! raw line stream, and fans protocol events out to pluggable modules
//! through an ordered dispatch bus.
//!
//! ## Quick start
//!
//! ```no_run
//! use slirc_client::{Client, Config};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load("bot.toml")?;
//! let mut client = Client::new(config);
//! slirc_client::modules::register_builtins(&mut client.controller);
//! client.start_modules();
//! client.connect().await?;
//! client.run().await
//! # }
//! ```
//!
//! ## Offline use
//!
//! The whole engine runs without a network: feed framed lines through
//! [`Client::feed_line`] and observe state and events. This is how the
//! integration tests drive scripted sessions.
//!
//! The core is single-threaded by design. One logical task reads,
//! parses, mutates state, and fans out to modules before the next line
//! is touched; cross-thread producers must marshal onto that task.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod bus;
pub mod client;
pub mod config;
pub mod control;
pub mod error;
pub mod event;
pub mod modules;
pub mod protocol;
pub mod state;
pub mod transport;

pub use self::bus::{Bus, Hook};
pub use self::client::Client;
pub use self::config::{Config, ServerConfig};
pub use self::control::{Controller, Module, ModuleCtx, ModuleFactory};
pub use self::error::{ConfigError, LoadError};
pub use self::event::{Event, EventKind, ModeOp, Outcome, Recipient};
pub use self::state::{Channel, ModeValue, Server, Session, WhoisChannel, WhoisReply};

pub use slirc_wire as wire;
