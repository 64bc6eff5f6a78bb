//! Per-session ownership of a bit, an agent and a generator.
//!
//! Each session is an independent world: requests for one id never touch
//! another id's state. The store is a `DashMap`, so a handler holds the
//! shard lock only for the synchronous closure it passes in.
//!
//! Sessions idle longer than the configured TTL are pruned, and opening a
//! session at capacity evicts the least recently used one.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

use crate::agent::MuzaAgent;
use crate::config::ServerConfig;
use crate::hyperbit::{EmotionClassifier, HyperBitState};

pub const AGENT_NAME: &str = "Муза";

/// State owned by one session.
#[derive(Debug)]
pub struct Session {
    /// The user's bit, imprinted by every analyzed message.
    pub bit: HyperBitState,
    pub agent: MuzaAgent,
    pub rng: StdRng,
    pub created_at: DateTime<Utc>,
    /// Bumped on every [`SessionStore::with_session`] call.
    pub last_access: DateTime<Utc>,
}

/// Concurrent map from session id to [`Session`].
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    config: ServerConfig,
    classifier: EmotionClassifier,
}

impl SessionStore {
    pub fn new(config: ServerConfig, classifier: EmotionClassifier) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
            classifier,
        }
    }

    /// Open a session under a fresh UUID and return the id.
    pub fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.create_with_id(&id);
        id
    }

    /// Open (or reset) the session `id`.
    ///
    /// A new id first prunes idle sessions, then evicts least recently used
    /// ones until there is room under `max_sessions`.
    pub fn create_with_id(&self, id: &str) {
        if !self.sessions.contains_key(id) {
            self.prune_idle(Utc::now());
            while self.sessions.len() >= self.config.max_sessions {
                if !self.evict_least_recent() {
                    break;
                }
            }
        }
        let bit = HyperBitState::named(self.config.sender.clone())
            .with_classifier(self.classifier.clone());
        let agent = MuzaAgent::new(AGENT_NAME, self.config.personality)
            .with_classifier(self.classifier.clone());
        let now = Utc::now();
        let session = Session {
            bit,
            agent,
            rng: self.rng_for(id),
            created_at: now,
            last_access: now,
        };
        self.sessions.insert(id.to_string(), session);
        log::debug!("session {} opened", id);
    }

    /// Generator for `id`: derived from the configured seed when there is
    /// one, otherwise from OS entropy.
    fn rng_for(&self, id: &str) -> StdRng {
        match self.config.seed {
            Some(seed) => {
                let digest = Sha256::digest(id.as_bytes());
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(&digest[..8]);
                StdRng::seed_from_u64(seed ^ u64::from_le_bytes(bytes))
            }
            None => StdRng::from_entropy(),
        }
    }

    /// Run `f` against session `id`, or return `None` if it does not exist.
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        self.sessions.get_mut(id).map(|mut entry| {
            let session = entry.value_mut();
            session.last_access = Utc::now();
            f(session)
        })
    }

    /// Drop every session untouched for `session_ttl_secs` as of `now`.
    /// Returns how many were dropped.
    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.config.session_ttl_secs;
        let before = self.sessions.len();
        self.sessions.retain(|id, session| {
            let idle = u64::try_from((now - session.last_access).num_seconds()).unwrap_or(0);
            let keep = idle < ttl;
            if !keep {
                log::debug!("session {} expired after {}s idle", id, idle);
            }
            keep
        });
        before.saturating_sub(self.sessions.len())
    }

    /// Remove the session with the oldest `last_access`. Returns false when
    /// the store is empty.
    fn evict_least_recent(&self) -> bool {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.value().last_access)
            .map(|entry| entry.key().clone());
        match oldest {
            Some(id) => {
                self.sessions.remove(&id);
                log::debug!("session {} evicted at capacity", id);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Drop session `id`. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            log::debug!("session {} closed", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
