//! Redis online store configuration
//!
//! The configuration surface is a plain options mapping, shared with
//! deployments driven from other languages. Two options are
//! recognized:
//!
//! - `redis_type`: `"redis"` (default) or `"redis_cluster"`
//! - `connection_string`: `"<host:port>[,password=...][,ssl=...]"`,
//!   default `"localhost:6379"`
//!
//! Anything malformed fails here, at construction time, so a
//! misconfigured store never reaches the read path.

use std::collections::HashMap;

use plumage_core::{Error, Result};

/// Redis topology, either a single node server or a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedisMode {
    Single,
    Cluster,
}

/// Parsed configuration for the Redis online store
#[derive(Debug, Clone)]
pub struct RedisOptions {
    pub mode: RedisMode,
    /// host:port addresses; single-node mode uses the first
    pub addresses: Vec<String>,
    pub password: Option<String>,
    /// Parsed for forward compatibility; TLS is not wired up yet
    pub ssl: bool,
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self {
            mode: RedisMode::Single,
            addresses: vec!["localhost:6379".to_string()],
            password: None,
            ssl: false,
        }
    }
}

impl RedisOptions {
    /// Parses the raw options mapping
    ///
    /// Absent options fall back to their defaults; unrecognized option
    /// names and unparseable connection-string parts are errors.
    pub fn from_map(options: &HashMap<String, String>) -> Result<Self> {
        let mode = match options.get("redis_type").map(String::as_str) {
            None | Some("redis") => RedisMode::Single,
            Some("redis_cluster") => RedisMode::Cluster,
            Some(other) => {
                return Err(Error::config(format!(
                    "unrecognized redis_type '{other}', must be one of 'redis', 'redis_cluster'"
                )))
            }
        };

        let mut parsed = Self {
            mode,
            ..Default::default()
        };

        if let Some(connection_string) = options.get("connection_string") {
            parsed.addresses = Vec::new();
            for part in connection_string.split(',') {
                if part.contains(':') {
                    parsed.addresses.push(part.to_string());
                } else if let Some((name, value)) = part.split_once('=') {
                    match name {
                        "password" => parsed.password = Some(value.to_string()),
                        "ssl" => parsed.ssl = value == "true",
                        _ => {
                            return Err(Error::config(format!(
                                "unrecognized option in connection_string: '{name}', \
                                 must be one of 'password', 'ssl'"
                            )))
                        }
                    }
                } else {
                    return Err(Error::config(format!(
                        "unable to parse part of connection_string: '{part}', \
                         must contain either ':' (address) or '=' (option)"
                    )));
                }
            }
            if parsed.addresses.is_empty() {
                return Err(Error::config(
                    "connection_string contains no host:port address",
                ));
            }
        }

        Ok(parsed)
    }

    /// Connection URL for the single-node client
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!("redis://:{}@{}", password, self.addresses[0]),
            None => format!("redis://{}", self.addresses[0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_map_uses_defaults() {
        let options = RedisOptions::from_map(&HashMap::new()).unwrap();
        assert_eq!(options.mode, RedisMode::Single);
        assert_eq!(options.addresses, vec!["localhost:6379".to_string()]);
        assert!(options.password.is_none());
        assert_eq!(options.url(), "redis://localhost:6379");
    }

    #[test]
    fn test_connection_string_with_password_and_ssl() {
        let options = RedisOptions::from_map(&map(&[(
            "connection_string",
            "redis.prod:6380,password=hunter2,ssl=true",
        )]))
        .unwrap();
        assert_eq!(options.addresses, vec!["redis.prod:6380".to_string()]);
        assert_eq!(options.password.as_deref(), Some("hunter2"));
        assert!(options.ssl);
        assert_eq!(options.url(), "redis://:hunter2@redis.prod:6380");
    }

    #[test]
    fn test_cluster_type_parses() {
        let options = RedisOptions::from_map(&map(&[("redis_type", "redis_cluster")])).unwrap();
        assert_eq!(options.mode, RedisMode::Cluster);
    }

    #[test]
    fn test_unknown_redis_type_rejected() {
        let err = RedisOptions::from_map(&map(&[("redis_type", "memcached")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_connection_option_rejected() {
        let err = RedisOptions::from_map(&map(&[(
            "connection_string",
            "localhost:6379,timeout=5",
        )]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unparseable_part_rejected() {
        let err =
            RedisOptions::from_map(&map(&[("connection_string", "justahost")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_options_only_connection_string_rejected() {
        let err =
            RedisOptions::from_map(&map(&[("connection_string", "password=x")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
