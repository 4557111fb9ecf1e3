//! RFC 1459 case mapping.
//!
//! Nicks and channel names compare case-insensitively on IRC, and the
//! `rfc1459` mapping additionally treats `[]\~` as the uppercase forms of
//! `{}|^`. Every case-insensitive lookup in the client goes through these
//! functions so the whole tree agrees on what "the same nick" means.

/// Lowercase one character under the RFC 1459 mapping.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    match c {
        'A'..='Z' => (c as u8 + 32) as char,
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c,
    }
}

/// Lowercase a whole string under the RFC 1459 mapping.
///
/// Used to build the canonical keys for channel and member maps.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(irc_lower_char).collect()
}

/// Case-insensitive string comparison under the RFC 1459 mapping.
pub fn irc_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.chars()
        .map(irc_lower_char)
        .eq(b.chars().map(irc_lower_char))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_plain_ascii() {
        assert_eq!(irc_lower_char('Q'), 'q');
        assert_eq!(irc_lower_char('q'), 'q');
        assert_eq!(irc_lower_char('3'), '3');
    }

    #[test]
    fn lowercase_bracket_family() {
        assert_eq!(irc_to_lower("Nick[Away]"), "nick{away}");
        assert_eq!(irc_to_lower("a\\b~c"), "a|b^c");
    }

    #[test]
    fn equality_is_casemapped() {
        assert!(irc_eq("KitBot", "kitbot"));
        assert!(irc_eq("[foo]^", "{FOO}~"));
        assert!(!irc_eq("kitbot", "kitbot2"));
        assert!(!irc_eq("", "x"));
    }

    #[test]
    fn channel_keys_are_stable() {
        assert_eq!(irc_to_lower("#Rust[Lang]"), irc_to_lower("#rust{lang}"));
    }
}
