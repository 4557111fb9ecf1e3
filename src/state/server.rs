//! Server-side session state: features, channels, MOTD, WHOIS buffer.

use std::collections::{BTreeSet, HashMap};

use slirc_wire::{irc_to_lower, ChanModes, FeatureValue, PrefixMap, DEFAULT_CHANTYPES};
use tracing::{info, warn};

use super::{Channel, WhoisReply};

/// Everything we know about the server side of the connection.
pub struct Server {
    /// Hostname as reported by MYINFO, once registered.
    pub host: String,
    /// Hostname we were asked to connect to.
    pub original_host: String,
    /// Port we were asked to connect to.
    pub port: u16,
    /// Connection password, if one was sent.
    pub password: Option<String>,
    /// The last complete MOTD.
    pub motd: String,
    /// Server software version from MYINFO.
    pub version: Option<String>,
    /// Build date text from CREATED.
    pub created: Option<String>,
    /// Raw ISUPPORT key/value pairs from FEATURELIST.
    pub features: HashMap<String, FeatureValue>,
    /// User mode alphabet from MYINFO.
    pub user_modes: BTreeSet<char>,
    /// Channel mode alphabet from MYINFO.
    pub channel_modes: BTreeSet<char>,
    channels: HashMap<String, Channel>,
    motd_buf: Vec<String>,
    pub(crate) whois: Option<WhoisReply>,
}

impl Server {
    /// Create the record for a connection target.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Server {
            original_host: host.clone(),
            host,
            port,
            password: None,
            motd: String::new(),
            version: None,
            created: None,
            features: HashMap::new(),
            user_modes: BTreeSet::new(),
            channel_modes: BTreeSet::new(),
            channels: HashMap::new(),
            motd_buf: Vec::new(),
            whois: None,
        }
    }

    /// Start tracking a channel. Re-adding one is a warned no-op.
    pub fn add_channel(&mut self, name: &str) {
        let key = irc_to_lower(name);
        if self.channels.contains_key(&key) {
            warn!(channel = %name, "ignoring duplicate channel add");
            return;
        }
        info!(channel = %name, "now tracking channel");
        self.channels.insert(key, Channel::new(name));
    }

    /// Stop tracking a channel. Removing an unknown one is a warned no-op.
    /// Returns whether anything was removed.
    pub fn remove_channel(&mut self, name: &str) -> bool {
        if self.channels.remove(&irc_to_lower(name)).is_none() {
            warn!(channel = %name, "ignoring removal of unknown channel");
            return false;
        }
        info!(channel = %name, "no longer tracking channel");
        true
    }

    /// Look up a tracked channel (case-insensitively).
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&irc_to_lower(name))
    }

    /// Mutable channel lookup.
    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(&irc_to_lower(name))
    }

    /// Whether `name` is a channel we are tracking.
    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.contains_key(&irc_to_lower(name))
    }

    /// Iterate over the tracked channels.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    /// The CHANTYPES prefixes, or the RFC default.
    pub fn chantypes(&self) -> String {
        self.features
            .get("CHANTYPES")
            .and_then(FeatureValue::as_str)
            .unwrap_or(DEFAULT_CHANTYPES)
            .to_string()
    }

    /// The PREFIX mapping, or the RFC default. Malformed advertisements
    /// also fall back to the default.
    pub fn prefix_map(&self) -> PrefixMap {
        self.features
            .get("PREFIX")
            .and_then(FeatureValue::as_str)
            .and_then(PrefixMap::parse)
            .unwrap_or_default()
    }

    /// The CHANMODES categorization, or the RFC 2811 default.
    pub fn chan_modes(&self) -> ChanModes {
        self.features
            .get("CHANMODES")
            .and_then(FeatureValue::as_str)
            .and_then(ChanModes::parse)
            .unwrap_or_default()
    }

    pub(crate) fn motd_reset(&mut self) {
        self.motd_buf.clear();
    }

    pub(crate) fn motd_push(&mut self, line: &str) {
        self.motd_buf.push(line.to_string());
    }

    pub(crate) fn motd_finish(&mut self) -> String {
        self.motd = self.motd_buf.join("\n");
        self.motd_buf.clear();
        self.motd.clone()
    }
}
