//! The live session state model.
//!
//! Everything the parsers learn about the connection lands here: the
//! server's advertised features, the channels we occupy and their rosters,
//! the WHOIS buffer, and our own identity.

mod channel;
mod server;
mod session;
mod whois;

pub use channel::{Channel, ModeValue};
pub use server::Server;
pub use session::Session;
pub use whois::{WhoisChannel, WhoisReply};
