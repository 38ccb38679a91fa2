use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Anything kept in a [`SessionStore`] carries its creation time.
pub trait Session {
    fn created_at(&self) -> DateTime<Utc>;
}

/// In-process session registry. Guards are never held across an `.await`:
/// callers go through [`SessionStore::with`], which runs a closure under the
/// lock and returns its result.
///
/// Sessions older than the store's TTL are dropped on the next insert and
/// are invisible to lookups until then.
pub struct SessionStore<T> {
    sessions: Mutex<HashMap<Uuid, T>>,
    ttl: Duration,
}

impl<T: Session + Clone> SessionStore<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, T>> {
        // A panic while holding the lock leaves plain data behind.
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_live(&self, session: &T, now: DateTime<Utc>) -> bool {
        now - session.created_at() < self.ttl
    }

    pub fn insert(&self, id: Uuid, session: T) {
        let now = Utc::now();
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, existing| self.is_live(existing, now));
        let expired = before - sessions.len();
        if expired > 0 {
            log::debug!("Dropped {} expired sessions", expired);
        }
        sessions.insert(id, session);
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        let now = Utc::now();
        self.lock()
            .get(id)
            .filter(|session| self.is_live(session, now))
            .cloned()
    }

    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.lock().remove(id)
    }

    /// Runs `f` on the session, if it exists and has not expired.
    pub fn with<R>(&self, id: &Uuid, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let now = Utc::now();
        self.lock()
            .get_mut(id)
            .filter(|session| self.is_live(session, now))
            .map(f)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Draft {
        value: u32,
        created_at: DateTime<Utc>,
    }

    impl Session for Draft {
        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
    }

    fn draft(value: u32, age: Duration) -> Draft {
        Draft {
            value,
            created_at: Utc::now() - age,
        }
    }

    #[test]
    fn test_insert_update_remove() {
        let store = SessionStore::new(Duration::hours(1));
        let id = Uuid::new_v4();
        store.insert(id, draft(1, Duration::zero()));

        let updated = store.with(&id, |d| {
            d.value += 1;
            d.value
        });
        assert_eq!(updated, Some(2));
        assert_eq!(store.get(&id).map(|d| d.value), Some(2));
        assert_eq!(store.remove(&id).map(|d| d.value), Some(2));
        assert!(store.is_empty());
        assert_eq!(store.with(&id, |d| d.value), None);
    }

    #[test]
    fn test_expired_sessions_are_swept_on_insert() {
        let store = SessionStore::new(Duration::minutes(30));
        let stale = Uuid::new_v4();
        let fresh = Uuid::new_v4();
        store.insert(stale, draft(1, Duration::minutes(31)));
        assert_eq!(store.len(), 1);

        // Still stored, but no longer reachable
        assert_eq!(store.get(&stale), None);
        assert_eq!(store.with(&stale, |d| d.value), None);

        store.insert(fresh, draft(2, Duration::minutes(29)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&fresh).map(|d| d.value), Some(2));
    }
}
