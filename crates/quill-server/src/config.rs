use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

/// Selects an in-memory store instead of a file.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Config {
    /// Read `QUILL_HOST`, `QUILL_PORT` and `QUILL_DB_PATH`, falling back to
    /// defaults for any that are unset.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("QUILL_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("QUILL_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("QUILL_PORT must be a port number")?;
        let db_path = lookup("QUILL_DB_PATH")
            .unwrap_or_else(|| "quill.db".into())
            .into();

        Ok(Self {
            host,
            port,
            db_path,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_path, PathBuf::from("quill.db"));
        assert!(!config.in_memory());
        assert_eq!(config.addr().unwrap().port(), 3000);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("QUILL_HOST", "127.0.0.1"),
            ("QUILL_PORT", "8080"),
            ("QUILL_DB_PATH", ":memory:"),
        ]))
        .unwrap();
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:8080");
        assert!(config.in_memory());
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::from_lookup(lookup(&[("QUILL_PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("QUILL_PORT", "70000")])).is_err());
    }

    #[test]
    fn rejects_bad_host() {
        let config = Config::from_lookup(lookup(&[("QUILL_HOST", "not a host")])).unwrap();
        assert!(config.addr().is_err());
    }
}
