use std::{collections::HashMap, sync::Arc, time::Duration as StdDuration};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    server::app_state::AppState,
    session::models::{SessionError, VisitorId},
};

/// Per-visitor key/value state. Visitors never share entries.
pub trait SessionStore: Send + Sync {
    fn get(&self, visitor: &VisitorId, key: &str) -> Option<Value>;

    fn set(&self, visitor: &VisitorId, key: &str, value: Value);

    fn clear(&self, visitor: &VisitorId);

    fn get_or(&self, visitor: &VisitorId, key: &str, default: Value) -> Value {
        self.get(visitor, key).unwrap_or(default)
    }
}

struct SessionEntry {
    values: HashMap<String, Value>,
    last_access: DateTime<Utc>,
}

impl SessionEntry {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            values: HashMap::new(),
            last_access: now,
        }
    }
}

pub struct MemorySessionStore {
    lifetime: Duration,
    entries: DashMap<VisitorId, SessionEntry>,
}

impl MemorySessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            entries: DashMap::new(),
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.entries.len()
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub(crate) fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !self.is_expired(entry.last_access, now));

        before.saturating_sub(self.entries.len())
    }

    fn is_expired(&self, last_access: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - last_access > self.lifetime
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, visitor: &VisitorId, key: &str) -> Option<Value> {
        let now = Utc::now();
        {
            let mut entry = self.entries.get_mut(visitor)?;
            if !self.is_expired(entry.last_access, now) {
                entry.last_access = now;
                return entry.values.get(key).cloned();
            }
        }

        debug!("Session for visitor {} expired", visitor);
        self.entries
            .remove_if(visitor, |_, entry| self.is_expired(entry.last_access, now));

        None
    }

    fn set(&self, visitor: &VisitorId, key: &str, value: Value) {
        let now = Utc::now();
        let mut entry = self
            .entries
            .entry(*visitor)
            .or_insert_with(|| SessionEntry::new(now));

        if self.is_expired(entry.last_access, now) {
            entry.values.clear();
        }

        entry.last_access = now;
        entry.values.insert(key.to_string(), value);
    }

    fn clear(&self, visitor: &VisitorId) {
        self.entries.remove(visitor);
    }
}

/// One visitor's view of a store. Every controller call receives one of these.
pub struct SessionHandle<'a> {
    store: &'a dyn SessionStore,
    visitor: VisitorId,
}

impl<'a> SessionHandle<'a> {
    pub fn new(store: &'a dyn SessionStore, visitor: VisitorId) -> Self {
        Self { store, visitor }
    }

    pub fn visitor(&self) -> VisitorId {
        self.visitor
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        let Some(value) = self.store.get(&self.visitor, key) else {
            return Ok(None);
        };

        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| SessionError::Decode {
                key: key.to_string(),
                source,
            })
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, SessionError> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SessionError> {
        let value = serde_json::to_value(value).map_err(|source| SessionError::Encode {
            key: key.to_string(),
            source,
        })?;

        self.store.set(&self.visitor, key, value);
        Ok(())
    }

    pub fn clear(&self) {
        self.store.clear(&self.visitor);
    }
}

pub fn spawn_session_cleanup(state: Arc<AppState>, every: StdDuration) {
    let mut interval = tokio::time::interval(every);

    tokio::spawn(async move {
        loop {
            interval.tick().await;
            let purged = state.get_sessions().purge_expired();
            if purged > 0 {
                info!("Purged {} expired sessions", purged);
            }
        }
    });
}
