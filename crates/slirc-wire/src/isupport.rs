//! ISUPPORT-derived server capability views.
//!
//! Servers describe themselves in 005 (RPL_ISUPPORT) tokens. The client
//! stores the raw key/value pairs and derives these typed views on demand,
//! falling back to the RFC values for servers that never advertise them.

use std::fmt;

/// Channel-type prefixes assumed before any ISUPPORT negotiation.
pub const DEFAULT_CHANTYPES: &str = "#";

/// One ISUPPORT value, opportunistically parsed as an integer.
///
/// `NICKLEN=30` becomes `Int(30)`; `CHANTYPES=#&` stays `Text`. A token
/// with no `=` is stored as empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureValue {
    /// The value parsed as a whole integer.
    Int(i64),
    /// Anything else, verbatim.
    Text(String),
}

impl FeatureValue {
    /// Parse a raw token value.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => FeatureValue::Int(n),
            Err(_) => FeatureValue::Text(raw.to_string()),
        }
    }

    /// The textual value, if this was not an integer.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            FeatureValue::Int(_) => None,
        }
    }

    /// The integer value, if there was one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FeatureValue::Int(n) => Some(*n),
            FeatureValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(n) => write!(f, "{n}"),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

/// The PREFIX mapping of privilege symbols to mode letters.
///
/// Parsed from tokens like `PREFIX=(qaohv)~&@%+`; positions pair up, so
/// `~` maps to `q` and so on. The default is the RFC pair `(ov)@+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    letters: Vec<char>,
    symbols: Vec<char>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        PrefixMap {
            letters: vec!['o', 'v'],
            symbols: vec!['@', '+'],
        }
    }
}

impl PrefixMap {
    /// Parse a `(letters)symbols` PREFIX value. Returns `None` on malformed
    /// input (missing parens, empty, or mismatched lengths).
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix('(')?;
        let (letters, symbols) = rest.split_once(')')?;
        if letters.is_empty() || letters.chars().count() != symbols.chars().count() {
            return None;
        }
        Some(PrefixMap {
            letters: letters.chars().collect(),
            symbols: symbols.chars().collect(),
        })
    }

    /// The mode letter behind a privilege symbol, if the symbol is known.
    pub fn letter_for_symbol(&self, symbol: char) -> Option<char> {
        let idx = self.symbols.iter().position(|s| *s == symbol)?;
        self.letters.get(idx).copied()
    }

    /// Whether `c` is one of the advertised privilege symbols.
    pub fn is_symbol(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    /// The privilege mode letters, highest first.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.letters.iter().copied()
    }

    /// Split the leading privilege symbols off a NAMES or WHOIS token.
    ///
    /// `@+nick` becomes `(['@', '+'], "nick")`. Symbols keep their
    /// advertised order, so the first one is the highest privilege.
    pub fn split_prefixes<'a>(&self, token: &'a str) -> (Vec<char>, &'a str) {
        let mut symbols = Vec::new();
        let mut rest = token;
        while let Some(c) = rest.chars().next() {
            if !self.is_symbol(c) {
                break;
            }
            symbols.push(c);
            rest = &rest[c.len_utf8()..];
        }
        (symbols, rest)
    }
}

/// The CHANMODES four-way categorization of channel mode letters.
///
/// List modes carry an argument but are never stored as channel state;
/// always-argument modes carry one both ways; set-argument modes carry one
/// only when set; toggles never carry one. The default is the RFC 2811
/// alphabet `beI,k,l,aimnqpst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChanModes {
    /// List-type modes (bans and friends).
    pub list: String,
    /// Modes whose argument is present on both set and unset.
    pub always_arg: String,
    /// Modes whose argument is present only on set.
    pub set_arg: String,
    /// Plain toggles.
    pub toggle: String,
}

impl Default for ChanModes {
    fn default() -> Self {
        ChanModes {
            list: "beI".into(),
            always_arg: "k".into(),
            set_arg: "l".into(),
            toggle: "aimnqpst".into(),
        }
    }
}

impl ChanModes {
    /// Parse a four-field `CHANMODES=b,k,l,imnpst` value.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut fields = raw.splitn(4, ',');
        let list = fields.next()?;
        let always_arg = fields.next()?;
        let set_arg = fields.next()?;
        let toggle = fields.next()?;
        Some(ChanModes {
            list: list.to_string(),
            always_arg: always_arg.to_string(),
            set_arg: set_arg.to_string(),
            toggle: toggle.to_string(),
        })
    }

    /// Whether `m` is a list-type mode.
    pub fn is_list(&self, m: char) -> bool {
        self.list.contains(m)
    }

    /// Whether `m` takes an argument on both set and unset.
    pub fn is_always_arg(&self, m: char) -> bool {
        self.always_arg.contains(m)
    }

    /// Whether `m` takes an argument only when set.
    pub fn is_set_arg(&self, m: char) -> bool {
        self.set_arg.contains(m)
    }

    /// Whether `m` is a plain toggle.
    pub fn is_toggle(&self, m: char) -> bool {
        self.toggle.contains(m)
    }

    /// Whether `m` consumes the next argument token in a MODE line.
    pub fn takes_argument(&self, m: char) -> bool {
        self.is_list(m) || self.is_always_arg(m) || self.is_set_arg(m)
    }
}
