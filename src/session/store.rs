//! Session map keyed by client address.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

/// Sessions last 20 minutes unless configured otherwise.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::from_secs(20 * 60);

/// Key-value continuity state for one client address.
#[derive(Debug)]
pub struct Session {
    values: Mutex<HashMap<String, String>>,
    last_activity: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            last_activity: Instant::now(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    /// Store a value, returning the previous one.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.lock().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.lock().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }

    /// When this session was created.
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// True once more than `duration` has passed since the last activity.
    pub fn is_expired(&self, duration: Duration) -> bool {
        self.last_activity.elapsed() > duration
    }
}

/// Thread-safe map from client address to its session.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<IpAddr, Arc<Session>>,
    duration: Duration,
}

impl SessionStore {
    pub fn new(duration: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            duration,
        }
    }

    /// Resolve the session for `addr` using the configured duration.
    pub fn get(&self, addr: IpAddr) -> Arc<Session> {
        let duration = self.duration;
        self.get_with(addr, |session| session.is_expired(duration))
    }

    /// Resolve the session for `addr`.
    ///
    /// An existing session for which `is_expired` holds is discarded and
    /// replaced by a fresh empty one. `is_expired` is only consulted when a
    /// session already exists.
    pub fn get_with<F>(&self, addr: IpAddr, is_expired: F) -> Arc<Session>
    where
        F: FnOnce(&Session) -> bool,
    {
        match self.sessions.entry(addr) {
            Entry::Occupied(mut entry) => {
                if is_expired(entry.get()) {
                    tracing::debug!(client = %addr, "Session expired, starting a new one");
                    let fresh = Arc::new(Session::new());
                    entry.insert(Arc::clone(&fresh));
                    fresh
                } else {
                    Arc::clone(entry.get())
                }
            }
            Entry::Vacant(entry) => {
                tracing::debug!(client = %addr, "Session created");
                let fresh = Arc::new(Session::new());
                entry.insert(Arc::clone(&fresh));
                fresh
            }
        }
    }

    /// Configured session lifetime.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Number of stored sessions, expired ones included until next accessed.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn addr(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn same_address_within_duration_shares_session() {
        let store = SessionStore::default();
        let first = store.get(addr(1));
        first.insert("user", "alice");

        let second = store.get(addr(1));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.get("user").as_deref(), Some("alice"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn distinct_addresses_get_distinct_sessions() {
        let store = SessionStore::default();
        let a = store.get(addr(1));
        let b = store.get(addr(2));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn expired_session_is_replaced_with_empty_one() {
        let store = SessionStore::new(Duration::from_millis(20));
        let first = store.get(addr(1));
        first.insert("cart", "3");

        std::thread::sleep(Duration::from_millis(50));

        let second = store.get(addr(1));
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(second.is_empty());
        assert!(second.last_activity() > first.last_activity());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn lookup_does_not_refresh_activity() {
        let store = SessionStore::default();
        let first = store.get(addr(3));
        let created = first.last_activity();

        std::thread::sleep(Duration::from_millis(5));
        let again = store.get(addr(3));
        assert_eq!(again.last_activity(), created);
    }

    #[test]
    fn predicate_only_called_for_existing_sessions() {
        let store = SessionStore::default();
        let mut calls = 0;
        store.get_with(addr(4), |_| {
            calls += 1;
            false
        });
        assert_eq!(calls, 0);

        let existing = store.get(addr(4));
        let replaced = store.get_with(addr(4), |_| true);
        assert!(!Arc::ptr_eq(&existing, &replaced));
    }

    #[test]
    fn session_values() {
        let session = Session::new();
        assert!(session.is_empty());
        assert_eq!(session.insert("k", "v1"), None);
        assert_eq!(session.insert("k", "v2").as_deref(), Some("v1"));
        assert!(session.contains_key("k"));
        assert_eq!(session.remove("k").as_deref(), Some("v2"));
        assert_eq!(session.len(), 0);
        assert!(!session.is_expired(Duration::from_secs(60)));
    }
}
