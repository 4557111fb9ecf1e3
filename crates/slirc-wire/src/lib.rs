//! # slirc-wire
//!
//! Wire-level primitives for Straylight IRC clients.
//!
//! This crate holds the parts of the protocol that carry no session state:
//!
//! - RFC 1459 case mapping, the ground truth for every nick and channel
//!   comparison in the client
//! - `Identity`, the `nick[!user]@host` triple IRC uses to name actors
//! - ISUPPORT-derived server capability views (`PrefixMap`, `ChanModes`,
//!   `FeatureValue`) with RFC defaults for servers that never advertise them
//! - the numeric-to-mnemonic reply table
//! - `LineCodec`, a tokio codec that frames the byte stream into lines
//!
//! Session tracking, event dispatch, and the module system live in the
//! `slirc-client` crate on top of these.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod error;
pub mod identity;
pub mod isupport;
#[cfg(feature = "tokio")]
pub mod line;
pub mod numeric;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::error::WireError;
pub use self::identity::Identity;
pub use self::isupport::{ChanModes, FeatureValue, PrefixMap, DEFAULT_CHANTYPES};
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::numeric::mnemonic;
