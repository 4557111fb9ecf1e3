//! TOML configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Bot configuration, deserialized from TOML.
///
/// ```toml
/// [server]
/// host = "irc.example.net"
/// nick = "kit"
///
/// [modules]
/// autojoin = 10
/// nick_in_use = 20
///
/// [channels]
/// "#kit" = ""
/// "#secret" = "hunter2"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Connection target and identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// Module name to load priority. Lower numbers load first and see
    /// events first. Values may be integers or strings holding integers;
    /// anything else fails the whole module reload.
    #[serde(default)]
    pub modules: BTreeMap<String, toml::Value>,
    /// Channel name to key (empty string for no key), consumed by the
    /// autojoin module.
    #[serde(default)]
    pub channels: BTreeMap<String, String>,
}

/// The `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname to connect to.
    pub host: String,
    /// Port to connect to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Nick to register with.
    pub nick: String,
    /// Username (ident); defaults to the nick.
    pub username: Option<String>,
    /// Real name; defaults to the username.
    pub realname: Option<String>,
    /// Server password, sent as PASS before registration.
    pub password: Option<String>,
    /// Whether to wrap the connection in TLS.
    #[serde(default)]
    pub tls: bool,
}

fn default_port() -> u16 {
    6667
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: String::new(),
            port: default_port(),
            nick: String::new(),
            username: None,
            realname: None,
            password: None,
            tls: false,
        }
    }
}

impl Config {
    /// Load and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// The configured modules as `(name, priority)`, lowest priority
    /// first, with name as the tiebreak. Any malformed priority fails the
    /// whole list.
    pub fn module_priorities(&self) -> Result<Vec<(String, i64)>, ConfigError> {
        let mut out = Vec::with_capacity(self.modules.len());
        for (name, value) in &self.modules {
            let priority = match value {
                toml::Value::Integer(n) => *n,
                toml::Value::String(s) => {
                    s.trim()
                        .parse::<i64>()
                        .map_err(|_| ConfigError::InvalidPriority {
                            name: name.clone(),
                            value: s.clone(),
                        })?
                }
                other => {
                    return Err(ConfigError::InvalidPriority {
                        name: name.clone(),
                        value: other.to_string(),
                    })
                }
            };
            out.push((name.clone(), priority));
        }
        out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_full_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"
[server]
host = "irc.example.net"
port = 6697
nick = "kit"
tls = true

[modules]
autojoin = 10
nick_in_use = "20"

[channels]
"#kit" = ""
"#secret" = "hunter2"
"##
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.host, "irc.example.net");
        assert_eq!(config.server.port, 6697);
        assert!(config.server.tls);
        assert_eq!(config.channels["#secret"], "hunter2");
        assert_eq!(
            config.module_priorities().unwrap(),
            vec![("autojoin".to_string(), 10), ("nick_in_use".to_string(), 20)]
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Config::load("/nonexistent/kit.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn priorities_sort_with_name_tiebreak() {
        let config: Config = toml::from_str(
            r#"
[modules]
b = 5
a = 5
z = 1
"#,
        )
        .unwrap();
        let names: Vec<String> = config
            .module_priorities()
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["z", "a", "b"]);
    }

    #[test]
    fn malformed_priority_fails_the_list() {
        let config: Config = toml::from_str(
            r#"
[modules]
good = 1
bad = "soon"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.module_priorities(),
            Err(ConfigError::InvalidPriority { .. })
        ));
    }

    #[test]
    fn defaults_apply_to_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 6667);
        assert!(config.modules.is_empty());
        assert!(config.module_priorities().unwrap().is_empty());
    }
}
