//! WHOIS response accumulation.

/// A channel the WHOIS subject occupies, with their highest privilege
/// symbol on it (`@`, `+`, ...), if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisChannel {
    /// Channel name.
    pub name: String,
    /// Highest privilege symbol, if the subject has one there.
    pub privilege: Option<char>,
}

/// The accumulated WHOIS response for one nick.
///
/// Sub-replies fill fields in as they arrive; ENDOFWHOIS publishes the
/// whole struct as a `WHOIS` event. A sub-reply for a different nick
/// discards the buffer and starts fresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhoisReply {
    /// The subject's nick.
    pub nick: String,
    /// Username from WHOISUSER.
    pub username: Option<String>,
    /// Host from WHOISUSER.
    pub host: Option<String>,
    /// Real name from WHOISUSER.
    pub realname: Option<String>,
    /// Server the subject is attached to.
    pub server: Option<String>,
    /// Free-form server description.
    pub server_info: Option<String>,
    /// Whether the subject is an IRC operator.
    pub operator: bool,
    /// Seconds idle, from WHOISIDLE.
    pub idle_secs: Option<u64>,
    /// Sign-on time as a unix timestamp, when the server includes one.
    pub signon: Option<i64>,
    /// Channels the subject occupies.
    pub channels: Vec<WhoisChannel>,
    /// Services account, from WHOISACCOUNT.
    pub account: Option<String>,
    /// Whether the server flagged the subject as a bot.
    pub bot: bool,
    /// Whether the nick is registered with services.
    pub registered: bool,
}

impl WhoisReply {
    /// Start an empty buffer for `nick`.
    pub fn new(nick: impl Into<String>) -> Self {
        WhoisReply {
            nick: nick.into(),
            ..WhoisReply::default()
        }
    }
}
