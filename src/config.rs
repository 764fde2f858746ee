use std::env;

pub const DEFAULT_ALLOWED_HOST: &str = "api.junkie-development.de";
pub const DEFAULT_EXTENSION: &str = "lua";
pub const DEFAULT_USER_AGENT: &str = "Volcano";

#[derive(Debug)]
pub enum ConfigError {
    MissingToken,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::MissingToken => write!(f, "DISCORD_TOKEN environment variable is missing."),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// `None` accepts links to any http(s) host.
    pub allowed_host: Option<String>,
    /// `Some` forces this extension onto every outgoing file and reads bodies as text.
    pub forced_extension: Option<String>,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("DISCORD_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let allowed_host = match lookup("ALLOWED_HOST") {
            None => Some(DEFAULT_ALLOWED_HOST.to_string()),
            Some(host) => {
                let host = host.trim();
                if host.is_empty() || host == "*" {
                    None
                } else {
                    Some(host.to_ascii_lowercase())
                }
            }
        };

        // Restrictive mode serves script source, so the extension defaults on with it.
        let forced_extension = match lookup("FORCE_EXTENSION") {
            Some(ext) => {
                let ext = ext.trim().trim_start_matches('.');
                (!ext.is_empty()).then(|| ext.to_string())
            }
            None => allowed_host.as_ref().map(|_| DEFAULT_EXTENSION.to_string()),
        };

        let user_agent = lookup("USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Config {
            token,
            allowed_host,
            forced_extension,
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_token_is_an_error() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingToken)));
        assert!(matches!(load(&[("DISCORD_TOKEN", "  ")]), Err(ConfigError::MissingToken)));
    }

    #[test]
    fn defaults_to_restrictive_lua_mode() {
        let config = load(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.allowed_host.as_deref(), Some(DEFAULT_ALLOWED_HOST));
        assert_eq!(config.forced_extension.as_deref(), Some("lua"));
        assert_eq!(config.user_agent, "Volcano");
    }

    #[test]
    fn wildcard_host_switches_to_permissive_mode() {
        let config = load(&[("DISCORD_TOKEN", "abc"), ("ALLOWED_HOST", "*")]).unwrap();
        assert_eq!(config.allowed_host, None);
        assert_eq!(config.forced_extension, None);
    }

    #[test]
    fn explicit_extension_overrides_mode_default() {
        let config = load(&[
            ("DISCORD_TOKEN", "abc"),
            ("ALLOWED_HOST", ""),
            ("FORCE_EXTENSION", ".txt"),
        ])
        .unwrap();
        assert_eq!(config.allowed_host, None);
        assert_eq!(config.forced_extension.as_deref(), Some("txt"));

        let config = load(&[("DISCORD_TOKEN", "abc"), ("FORCE_EXTENSION", "")]).unwrap();
        assert_eq!(config.allowed_host.as_deref(), Some(DEFAULT_ALLOWED_HOST));
        assert_eq!(config.forced_extension, None);
    }

    #[test]
    fn custom_host_is_lowercased() {
        let config = load(&[("DISCORD_TOKEN", "abc"), ("ALLOWED_HOST", "Files.Example.COM")]).unwrap();
        assert_eq!(config.allowed_host.as_deref(), Some("files.example.com"));
    }
}
