//! Numeric reply mnemonics.
//!
//! The client keys its parser registry on command names, so numeric replies
//! are translated to their RFC mnemonics before lookup. Only the numerics
//! the client engine reacts to are listed; everything else stays a bare
//! number and falls through to `RAWLINE`.

/// Translate a numeric reply token to its mnemonic, if we know it.
pub fn mnemonic(token: &str) -> Option<&'static str> {
    Some(match token {
        "001" => "WELCOME",
        "002" => "YOURHOST",
        "003" => "CREATED",
        "004" => "MYINFO",
        "005" => "FEATURELIST",
        "307" => "WHOISREGNICK",
        "311" => "WHOISUSER",
        "312" => "WHOISSERVER",
        "313" => "WHOISOPERATOR",
        "317" => "WHOISIDLE",
        "318" => "ENDOFWHOIS",
        "319" => "WHOISCHANNELS",
        "330" => "WHOISACCOUNT",
        "335" => "WHOISBOT",
        "353" => "NAMREPLY",
        "366" => "ENDOFNAMES",
        "372" => "MOTD",
        "375" => "MOTDSTART",
        "376" => "ENDOFMOTD",
        "422" => "NOMOTD",
        "431" => "NONICKNAMEGIVEN",
        "433" => "NICKNAMEINUSE",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_numerics_translate() {
        assert_eq!(mnemonic("001"), Some("WELCOME"));
        assert_eq!(mnemonic("005"), Some("FEATURELIST"));
        assert_eq!(mnemonic("353"), Some("NAMREPLY"));
        assert_eq!(mnemonic("433"), Some("NICKNAMEINUSE"));
    }

    #[test]
    fn unknown_numerics_pass_through() {
        assert_eq!(mnemonic("999"), None);
        assert_eq!(mnemonic("PRIVMSG"), None);
    }
}
