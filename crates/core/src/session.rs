//! Session state, the single-writer session store, and persisted sessions

use crate::error::CoreResult;
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Snapshot of the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// True until the provider knows whether an identity exists
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: None,
            loading: true, // Start with loading until the stored session is checked
        }
    }
}

/// Transitions of the session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Successful login or identity refresh
    SetIdentity(Identity),
    /// Logout or detected session invalidity. Leaves `loading` alone.
    ClearIdentity,
    /// Explicit re-check; the only way back to `loading == true`
    BeginCheck,
    /// Result of a check
    Resolve(Option<Identity>),
}

impl SessionState {
    /// A resolved state with the given identity
    pub fn resolved(identity: Option<Identity>) -> Self {
        Self {
            identity,
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Apply an action, producing the next state
    pub fn reduce(&self, action: SessionAction) -> Self {
        match action {
            SessionAction::SetIdentity(identity) => Self {
                identity: Some(identity),
                loading: self.loading,
            },
            SessionAction::ClearIdentity => Self {
                identity: None,
                loading: self.loading,
            },
            SessionAction::BeginCheck => Self {
                identity: self.identity.clone(),
                loading: true,
            },
            SessionAction::Resolve(identity) => Self::resolved(identity),
        }
    }
}

/// Read/write access to the session, as consumed by guards and views
#[cfg_attr(test, mockall::automock)]
pub trait SessionProvider {
    /// Current state; no side effects
    fn state(&self) -> SessionState;

    /// Record the identity of a successful login and notify observers
    fn set_identity(&self, identity: Identity);

    /// Forget the identity and notify observers. The loading flag is unchanged.
    fn clear_identity(&self);
}

type Observer = Rc<dyn Fn(&SessionState)>;

struct StoreInner {
    state: SessionState,
    observers: Vec<(u64, Observer)>,
    next_observer_id: u64,
}

/// Framework-independent session container
///
/// Cloning yields another handle to the same state. All writes go through
/// [`SessionStore::dispatch`], which notifies every live subscriber once.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionState::default())
    }
}

impl SessionStore {
    pub fn new(state: SessionState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state,
                observers: Vec::new(),
                next_observer_id: 0,
            })),
        }
    }

    /// Apply an action and notify observers
    pub fn dispatch(&self, action: SessionAction) {
        let (state, observers) = {
            let mut inner = self.inner.borrow_mut();
            inner.state = inner.state.reduce(action);
            debug!(
                authenticated = inner.state.is_authenticated(),
                loading = inner.state.loading,
                "session state updated"
            );
            let observers: Vec<Observer> =
                inner.observers.iter().map(|(_, obs)| obs.clone()).collect();
            (inner.state.clone(), observers)
        };

        // Borrow released so observers may read or write the store
        for observer in observers {
            observer(&state);
        }
    }

    /// Register an observer; it stays registered until the returned handle is dropped
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, observer: impl Fn(&SessionState) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_observer_id;
        inner.next_observer_id += 1;
        inner.observers.push((id, Rc::new(observer)));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn begin_check(&self) {
        self.dispatch(SessionAction::BeginCheck);
    }

    pub fn resolve(&self, identity: Option<Identity>) {
        self.dispatch(SessionAction::Resolve(identity));
    }
}

impl SessionProvider for SessionStore {
    fn state(&self) -> SessionState {
        self.inner.borrow().state.clone()
    }

    fn set_identity(&self, identity: Identity) {
        self.dispatch(SessionAction::SetIdentity(identity));
    }

    fn clear_identity(&self) {
        self.dispatch(SessionAction::ClearIdentity);
    }
}

/// Handle returned by [`SessionStore::subscribe`]
pub struct Subscription {
    store: Weak<RefCell<StoreInner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store
                .borrow_mut()
                .observers
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// A login as kept in browser session storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: String,
    pub identity: Identity,
    /// Unix timestamp (seconds); `None` never expires
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl StoredSession {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a stored session, treating anything unreadable or expired as absent
    pub fn restore(raw: &str, now: i64) -> Option<Self> {
        let stored = match serde_json::from_str::<Self>(raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Discarding unreadable stored session: {e}");
                return None;
            }
        };

        if stored.is_expired(now) {
            debug!(user_id = %stored.identity.id, "Stored session has expired");
            return None;
        }

        Some(stored)
    }
}
