//! Runtime configuration read from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::agent::PersonalityType;
use crate::hyperbit::{EmotionClassifier, EmotionTable};
use crate::utilities::errors::MuzaError;
use crate::utilities::file_handler;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SENDER: &str = "Кира";
pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Configuration for the HTTP server and the sessions it creates.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `PORT`.
    pub port: u16,
    /// `MUZA_BIND`.
    pub bind: IpAddr,
    /// `MUZA_SEED`: base seed for per-session generators.
    pub seed: Option<u64>,
    /// `MUZA_PERSONALITY`: preset for each session's agent.
    pub personality: PersonalityType,
    /// `MUZA_SENDER`: who the agent believes it is talking to.
    pub sender: String,
    /// `MUZA_EMOTIONS`: YAML file replacing the built-in emotion table.
    pub emotions: Option<PathBuf>,
    /// `MUZA_MAX_SESSIONS`: open sessions kept before evicting the least recently used.
    pub max_sessions: usize,
    /// `MUZA_SESSION_TTL`: seconds a session may sit idle before it is pruned.
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: IpAddr::from([0, 0, 0, 0]),
            seed: None,
            personality: PersonalityType::Creative,
            sender: DEFAULT_SENDER.to_string(),
            emotions: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> MuzaError {
    MuzaError::Config {
        key: key.to_string(),
        message: message.into(),
    }
}

fn positive<T>(key: &str, value: &str) -> Result<T, MuzaError>
where
    T: std::str::FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let parsed = value
        .parse::<T>()
        .map_err(|e| invalid(key, format!("{:?}: {}", value, e)))?;
    if parsed <= T::default() {
        return Err(invalid(key, format!("{:?} must be greater than zero", value)));
    }
    Ok(parsed)
}

impl ServerConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self, MuzaError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MuzaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| invalid("PORT", format!("{:?}: {}", v, e)))?,
            None => defaults.port,
        };
        let bind = match get("MUZA_BIND") {
            Some(v) => v
                .parse::<IpAddr>()
                .map_err(|e| invalid("MUZA_BIND", format!("{:?}: {}", v, e)))?,
            None => defaults.bind,
        };
        let seed = match get("MUZA_SEED") {
            Some(v) => Some(
                v.parse::<u64>()
                    .map_err(|e| invalid("MUZA_SEED", format!("{:?}: {}", v, e)))?,
            ),
            None => None,
        };
        let personality = match get("MUZA_PERSONALITY") {
            Some(v) => {
                let preset = PersonalityType::from_name(&v);
                if preset.as_str() != v.to_lowercase() {
                    return Err(invalid(
                        "MUZA_PERSONALITY",
                        format!("{:?} is not one of creative, analytical, empathic, chaotic", v),
                    ));
                }
                preset
            }
            None => defaults.personality,
        };
        let max_sessions = match get("MUZA_MAX_SESSIONS") {
            Some(v) => positive::<usize>("MUZA_MAX_SESSIONS", &v)?,
            None => defaults.max_sessions,
        };
        let session_ttl_secs = match get("MUZA_SESSION_TTL") {
            Some(v) => positive::<u64>("MUZA_SESSION_TTL", &v)?,
            None => defaults.session_ttl_secs,
        };

        Ok(Self {
            port,
            bind,
            seed,
            personality,
            sender: get("MUZA_SENDER").unwrap_or(defaults.sender),
            emotions: get("MUZA_EMOTIONS").map(PathBuf::from),
            max_sessions,
            session_ttl_secs,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Classifier for new sessions: the YAML table if configured, else the default.
    pub fn classifier(&self) -> Result<EmotionClassifier, MuzaError> {
        match &self.emotions {
            Some(path) => {
                let yaml = file_handler::read_text(path)?;
                Ok(EmotionClassifier::new(EmotionTable::from_yaml(&yaml)?))
            }
            None => Ok(EmotionClassifier::default()),
        }
    }
}
