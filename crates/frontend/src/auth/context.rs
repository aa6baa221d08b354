//! Global authentication context and provider

use crate::config::use_app_context;
use crate::services::AuthApiService;
use gloo::timers::callback::Interval;
use medibook_core::{Identity, SessionAction, SessionProvider, SessionState, StoredSession};
use std::ops::Deref;
use std::rc::Rc;
use tracing::{debug, info, warn};
use web_sys::Storage;
use yew::prelude::*;

/// Authentication context data
#[derive(Clone, Debug, PartialEq)]
pub struct AuthContextData {
    pub session: SessionState,
    /// The persisted login behind `session.identity`, with its token
    pub stored: Option<StoredSession>,
    pub error: Option<String>,
    storage_key: String,
}

/// Authentication context actions
#[derive(Debug)]
pub enum AuthAction {
    /// Successful login from the form
    Login(StoredSession),
    Logout,
    /// Result of reading sessionStorage on startup
    Restore(Option<StoredSession>),
    /// Fresh identity from the API for the session holding `token`
    RefreshIdentity { token: String, identity: Identity },
    /// The API rejected `token`; ends the session only if it still holds it
    RejectToken { token: String },
    SetIdentity(Identity),
    BeginCheck,
    /// Drop the session if it has expired by `now` (unix seconds)
    ValidateSession { now: i64 },
}

/// sessionStorage change that goes with a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageWrite {
    Save(StoredSession),
    Remove,
}

impl AuthContextData {
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            session: SessionState::default(),
            stored: None,
            error: None,
            storage_key: storage_key.into(),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.stored.as_ref().map(|stored| stored.token.as_str())
    }

    fn apply(
        &self,
        action: SessionAction,
        stored: Option<StoredSession>,
        error: Option<String>,
    ) -> Self {
        Self {
            session: self.session.reduce(action),
            stored,
            error,
            storage_key: self.storage_key.clone(),
        }
    }

    /// Next state for `action` and the storage write it calls for.
    /// `None` as the state means nothing changed.
    pub fn transition(&self, action: AuthAction) -> (Option<Self>, Option<StorageWrite>) {
        match action {
            AuthAction::Login(stored) => {
                info!(user_id = %stored.identity.id, role = %stored.identity.role, "Logged in");
                let identity = stored.identity.clone();
                let next = self.apply(SessionAction::SetIdentity(identity), Some(stored.clone()), None);
                (Some(next), Some(StorageWrite::Save(stored)))
            }
            AuthAction::Logout => {
                info!("Logged out");
                let next = self.apply(SessionAction::ClearIdentity, None, None);
                (Some(next), Some(StorageWrite::Remove))
            }
            AuthAction::Restore(stored) => {
                // Anything unreadable or expired was already discarded
                let write = stored.is_none().then_some(StorageWrite::Remove);
                let identity = stored.as_ref().map(|s| s.identity.clone());
                (Some(self.apply(SessionAction::Resolve(identity), stored, None)), write)
            }
            AuthAction::RefreshIdentity { token, identity } => {
                if self.token() != Some(token.as_str()) {
                    debug!("Ignoring identity refresh for a session that is gone");
                    return (None, None);
                }
                self.transition(AuthAction::SetIdentity(identity))
            }
            AuthAction::RejectToken { token } => {
                if self.token() != Some(token.as_str()) {
                    debug!("Ignoring rejection of a session that is gone");
                    return (None, None);
                }
                warn!("Stored session rejected by the server");
                self.transition(AuthAction::Logout)
            }
            AuthAction::SetIdentity(identity) => {
                let stored = self.stored.clone().map(|mut stored| {
                    stored.identity = identity.clone();
                    stored
                });
                let write = stored.clone().map(StorageWrite::Save);
                let next = self.apply(SessionAction::SetIdentity(identity), stored, self.error.clone());
                (Some(next), write)
            }
            AuthAction::BeginCheck => {
                let next = self.apply(SessionAction::BeginCheck, self.stored.clone(), None);
                (Some(next), None)
            }
            AuthAction::ValidateSession { now } => {
                let expired = self
                    .stored
                    .as_ref()
                    .is_some_and(|stored| stored.is_expired(now));
                if !expired {
                    return (None, None);
                }

                warn!("Session expired");
                let next = self.apply(
                    SessionAction::ClearIdentity,
                    None,
                    Some("Your session has expired. Please log in again.".to_string()),
                );
                (Some(next), Some(StorageWrite::Remove))
            }
        }
    }
}

impl Reducible for AuthContextData {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let (next, write) = self.transition(action);
        if let Some(write) = write {
            persist(&self.storage_key, write);
        }
        next.map_or(self, Rc::new)
    }
}

/// Authentication context handle
#[derive(Clone, PartialEq)]
pub struct AuthContext(UseReducerHandle<AuthContextData>);

impl AuthContext {
    pub fn dispatch(&self, action: AuthAction) {
        self.0.dispatch(action);
    }
}

impl Deref for AuthContext {
    type Target = AuthContextData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl SessionProvider for AuthContext {
    fn state(&self) -> SessionState {
        self.session.clone()
    }

    fn set_identity(&self, identity: Identity) {
        self.dispatch(AuthAction::SetIdentity(identity));
    }

    fn clear_identity(&self) {
        self.dispatch(AuthAction::Logout);
    }
}

/// Get sessionStorage
fn get_session_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.session_storage().ok().flatten())
}

/// Apply a storage write
fn persist(key: &str, write: StorageWrite) {
    let Some(storage) = get_session_storage() else {
        return;
    };

    match write {
        StorageWrite::Save(stored) => match stored.to_json() {
            Ok(serialized) => {
                if storage.set_item(key, &serialized).is_err() {
                    warn!("Failed to write session to sessionStorage");
                }
            }
            Err(e) => warn!("Failed to serialize session: {e}"),
        },
        StorageWrite::Remove => {
            let _ = storage.remove_item(key);
        }
    }
}

fn load_stored_session(key: &str, now: i64) -> Option<StoredSession> {
    let raw = get_session_storage()?.get_item(key).ok().flatten()?;
    StoredSession::restore(&raw, now)
}

/// Current time as a unix timestamp (seconds)
#[allow(clippy::cast_possible_truncation)]
fn now_unix() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}

/// Auth provider props
#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub children: Children,
}

/// Auth provider component
#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let app = use_app_context();
    let session_config = app.config.session.clone();
    let auth = {
        let storage_key = session_config.storage_key.clone();
        use_reducer(move || AuthContextData::new(storage_key))
    };

    // Load auth state from sessionStorage on mount, then confirm it with the API
    {
        let auth = auth.clone();
        let api_base_url = app.config.api_base_url.clone();
        let storage_key = session_config.storage_key.clone();
        use_effect_with((), move |_| {
            let restored = load_stored_session(&storage_key, now_unix());
            let token = restored.as_ref().map(|stored| stored.token.clone());
            auth.dispatch(AuthAction::Restore(restored));

            if let Some(token) = token {
                let service = AuthApiService::new(&api_base_url);
                wasm_bindgen_futures::spawn_local(async move {
                    match service.current_identity(&token).await {
                        Ok(identity) => {
                            auth.dispatch(AuthAction::RefreshIdentity { token, identity });
                        }
                        Err(e) if e.is_auth_expired() => {
                            auth.dispatch(AuthAction::RejectToken { token });
                        }
                        Err(e) => debug!("Identity refresh failed, keeping stored identity: {e}"),
                    }
                });
            }
        });
    }

    // Periodically drop expired sessions
    {
        let auth = auth.clone();
        let interval_ms = session_config.validation_interval_ms;
        use_effect_with(auth.stored.is_some(), move |has_session| {
            let interval = has_session.then(|| {
                Interval::new(interval_ms, move || {
                    auth.dispatch(AuthAction::ValidateSession { now: now_unix() });
                })
            });

            // Dropping the interval cancels it
            move || drop(interval)
        });
    }

    html! {
        <ContextProvider<AuthContext> context={AuthContext(auth)}>
            {props.children.clone()}
        </ContextProvider<AuthContext>>
    }
}

/// Hook to use auth context
#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .expect("AuthContext not found. Make sure to wrap your component with AuthProvider")
}

/// Hook to get the current identity
#[hook]
pub fn use_identity() -> Option<Identity> {
    let auth = use_auth();
    auth.identity().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medibook_core::Role;

    const KEY: &str = "medibook.session";

    fn stored(token: &str, expires_at: Option<i64>) -> StoredSession {
        StoredSession {
            token: token.to_string(),
            identity: Identity::new("p1", "pat@example.com", Role::Patient),
            expires_at,
        }
    }

    fn signed_in(token: &str, expires_at: Option<i64>) -> AuthContextData {
        let (next, _) = AuthContextData::new(KEY).transition(AuthAction::Restore(Some(stored(
            token, expires_at,
        ))));
        next.unwrap()
    }

    #[test]
    fn test_restore_without_session_resolves_and_purges_storage() {
        let (next, write) = AuthContextData::new(KEY).transition(AuthAction::Restore(None));
        let next = next.unwrap();

        assert_eq!(next.session, SessionState::resolved(None));
        assert_eq!(write, Some(StorageWrite::Remove));
    }

    #[test]
    fn test_restore_keeps_storage_untouched() {
        let (next, write) = AuthContextData::new(KEY)
            .transition(AuthAction::Restore(Some(stored("tok", None))));

        assert!(next.unwrap().session.is_authenticated());
        assert_eq!(write, None);
    }

    #[test]
    fn test_login_saves_and_logout_removes() {
        let (next, write) = AuthContextData::new(KEY)
            .transition(AuthAction::Login(stored("tok", Some(2_000))));
        let next = next.unwrap();
        assert_eq!(next.token(), Some("tok"));
        assert_eq!(write, Some(StorageWrite::Save(stored("tok", Some(2_000)))));

        let (next, write) = next.transition(AuthAction::Logout);
        let next = next.unwrap();
        assert!(next.identity().is_none());
        assert_eq!(next.token(), None);
        assert_eq!(write, Some(StorageWrite::Remove));
    }

    #[test]
    fn test_expired_session_is_cleared_with_message() {
        let data = signed_in("tok", Some(1_000));

        let (next, write) = data.transition(AuthAction::ValidateSession { now: 999 });
        assert!(next.is_none());
        assert_eq!(write, None);

        let (next, write) = data.transition(AuthAction::ValidateSession { now: 1_000 });
        let next = next.unwrap();
        assert!(next.identity().is_none());
        assert!(!next.session.loading);
        assert!(next.error.as_deref().is_some_and(|e| e.contains("expired")));
        assert_eq!(write, Some(StorageWrite::Remove));
    }

    #[test]
    fn test_refresh_for_stale_token_is_ignored() {
        let data = signed_in("new", None);
        let doctor = Identity::new("d1", "doc@example.com", Role::Doctor);

        let (next, write) = data.transition(AuthAction::RefreshIdentity {
            token: "old".to_string(),
            identity: doctor.clone(),
        });
        assert!(next.is_none());
        assert_eq!(write, None);

        let (next, write) = data.transition(AuthAction::RefreshIdentity {
            token: "new".to_string(),
            identity: doctor.clone(),
        });
        assert_eq!(next.unwrap().identity(), Some(&doctor));
        assert!(matches!(write, Some(StorageWrite::Save(saved)) if saved.identity == doctor));
    }

    #[test]
    fn test_rejection_of_old_token_keeps_newer_session() {
        let data = signed_in("new", None);

        let (next, write) = data.transition(AuthAction::RejectToken {
            token: "old".to_string(),
        });
        assert!(next.is_none());
        assert_eq!(write, None);

        let (next, write) = data.transition(AuthAction::RejectToken {
            token: "new".to_string(),
        });
        assert!(next.unwrap().identity().is_none());
        assert_eq!(write, Some(StorageWrite::Remove));
    }

    #[test]
    fn test_begin_check_keeps_stored_session() {
        let data = signed_in("tok", None);
        let (next, _) = data.transition(AuthAction::BeginCheck);
        let next = next.unwrap();

        assert!(next.session.loading);
        assert_eq!(next.token(), Some("tok"));
    }
}
