//! The process-wide session store.
//!
//! The session is the only piece of shared mutable state in the client. It
//! starts in [SessionState::Checking], settles after the one startup
//! check-auth call, and then moves between authenticated and
//! unauthenticated through explicit login/logout actions or a forced
//! expiry triggered by a 401 from any API call.
//!
//! Consumers that need to react to a logout register a callback with
//! [Session::subscribe]; the [LogoutReason] passed to the callback
//! distinguishes a user clicking "log out" from a session expiring under
//! them, so the UI can show the right message.

use std::sync::{Arc, Mutex};

use crate::{Error, api::ApiClient, api::AuthStatus, models::User};

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The user explicitly logged out.
    UserInitiated,
    /// The server rejected a request as unauthorized, meaning the session
    /// expired or was revoked externally.
    SessionExpired,
}

/// The authentication state of the client.
///
/// The original invariant "authenticated exactly when a user is held" is
/// structural here: there is no way to be [SessionState::Authenticated]
/// without a [User].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// The startup check-auth call has not resolved yet. Consumers must
    /// not render protected content in this state.
    Checking,
    /// No live session.
    Unauthenticated,
    /// A live session for the contained user.
    Authenticated(User),
}

/// Handle for removing a logout observer.
pub type SubscriptionId = u64;

type Observer = Arc<dyn Fn(LogoutReason) + Send + Sync>;

struct Inner {
    state: SessionState,
    checked: bool,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: SubscriptionId,
}

/// The process-wide session store.
///
/// Single-writer by construction: every transition goes through a method
/// on this type while holding the interior lock. Readers may be anywhere.
pub struct Session {
    inner: Mutex<Inner>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session store in the [SessionState::Checking] state.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: SessionState::Checking,
                checked: false,
                observers: Vec::new(),
                next_subscription: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means an observer panicked mid-notify; the
        // state itself is still a plain enum assignment, so recover it.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The current state.
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Whether a user is currently logged in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.lock().state, SessionState::Authenticated(_))
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        match &self.lock().state {
            SessionState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// Resolve the startup session check.
    ///
    /// Issues the check-auth call exactly once per process: the first call
    /// settles the session out of [SessionState::Checking], later calls
    /// return the current state without touching the network. A failed
    /// check (network or otherwise) settles as unauthenticated.
    pub async fn initialize(&self, client: &ApiClient) -> SessionState {
        {
            let mut inner = self.lock();

            if inner.checked {
                return inner.state.clone();
            }

            inner.checked = true;
        }

        let status = client.check_auth().await;
        self.settle(status)
    }

    /// Apply the result of the startup check-auth call.
    fn settle(&self, status: Result<AuthStatus, Error>) -> SessionState {
        let state = match status {
            Ok(AuthStatus {
                authenticated: true,
                user: Some(user),
            }) => SessionState::Authenticated(user),
            Ok(_) => SessionState::Unauthenticated,
            Err(error) => {
                tracing::warn!("session check failed, treating as logged out: {error}");
                SessionState::Unauthenticated
            }
        };

        let mut inner = self.lock();
        inner.state = state.clone();
        state
    }

    /// Record a successful login or registration.
    pub fn log_in(&self, user: User) {
        let mut inner = self.lock();
        inner.checked = true;
        inner.state = SessionState::Authenticated(user);
    }

    /// Log out: end the server session best-effort and clear local state.
    ///
    /// A failed logout request is logged and otherwise ignored; the local
    /// session is cleared regardless, and observers are notified with
    /// [LogoutReason::UserInitiated].
    pub async fn log_out(&self, client: &ApiClient) {
        if let Err(error) = client.log_out().await {
            tracing::warn!("logout request failed, clearing local session anyway: {error}");
        }

        let observers = {
            let mut inner = self.lock();
            inner.state = SessionState::Unauthenticated;
            inner.observers.iter().map(|(_, f)| f.clone()).collect::<Vec<_>>()
        };

        for observer in observers {
            observer(LogoutReason::UserInitiated);
        }
    }

    /// Force the session into the unauthenticated state, as when the
    /// server reports 401 on any call.
    ///
    /// Observers are notified with [LogoutReason::SessionExpired] only on
    /// the transition out of [SessionState::Authenticated]; expiring an
    /// already logged-out session is a no-op, so a burst of failed calls
    /// does not produce duplicate notifications.
    pub fn force_expire(&self) {
        let observers = {
            let mut inner = self.lock();

            let was_authenticated = matches!(inner.state, SessionState::Authenticated(_));
            inner.state = SessionState::Unauthenticated;
            inner.checked = true;

            if !was_authenticated {
                return;
            }

            inner.observers.iter().map(|(_, f)| f.clone()).collect::<Vec<_>>()
        };

        for observer in observers {
            observer(LogoutReason::SessionExpired);
        }
    }

    /// Wire a session to a client so any 401 forces expiry.
    ///
    /// This replaces the original design's untyped global broadcast: the
    /// client owns one hook, the session owns the observer list, and
    /// consumers subscribe on the session rather than listening to an
    /// ambient event.
    pub fn attach(session: &Arc<Self>, client: &ApiClient) {
        let session = Arc::clone(session);
        client.set_unauthorized_hook(move || session.force_expire());
    }

    /// Register a callback invoked whenever the session ends.
    pub fn subscribe(
        &self,
        observer: impl Fn(LogoutReason) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut inner = self.lock();
        let id = inner.next_subscription;
        inner.next_subscription += 1;
        inner.observers.push((id, Arc::new(observer)));
        id
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.lock();
        inner.observers.retain(|(observer_id, _)| *observer_id != id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use reqwest::StatusCode;

    use crate::{
        Error,
        api::{ApiClient, AuthStatus},
        config::Config,
        models::User,
    };

    use super::{LogoutReason, Session, SessionState};

    fn test_user() -> User {
        User {
            id: 1,
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            created_at: None,
        }
    }

    #[test]
    fn starts_in_checking_state() {
        let session = Session::new();

        assert_eq!(session.state(), SessionState::Checking);
        assert!(!session.is_authenticated());
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn settles_authenticated_when_check_reports_a_user() {
        let session = Session::new();

        let state = session.settle(Ok(AuthStatus {
            authenticated: true,
            user: Some(test_user()),
        }));

        assert_eq!(state, SessionState::Authenticated(test_user()));
        assert!(session.is_authenticated());
    }

    #[test]
    fn settles_unauthenticated_when_check_reports_no_session() {
        let session = Session::new();

        let state = session.settle(Ok(AuthStatus {
            authenticated: false,
            user: None,
        }));

        assert_eq!(state, SessionState::Unauthenticated);
    }

    #[test]
    fn settles_unauthenticated_when_check_fails() {
        let session = Session::new();

        let state = session.settle(Err(Error::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Request failed".to_owned(),
            body: serde_json::json!({}),
        }));

        assert_eq!(state, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn initialize_settles_unauthenticated_when_the_check_cannot_reach_the_server() {
        let session = Session::new();
        let client = ApiClient::new(Config::new("http://localhost:0")).unwrap();

        let state = session.initialize(&client).await;

        assert_eq!(state, SessionState::Unauthenticated);
        assert_eq!(session.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn initialize_is_a_no_op_after_the_first_resolution() {
        let session = Session::new();
        let client = ApiClient::new(Config::new("http://localhost:0")).unwrap();

        session.initialize(&client).await;
        session.log_in(test_user());

        // A second call neither re-checks nor resets the settled state.
        let state = session.initialize(&client).await;

        assert_eq!(state, SessionState::Authenticated(test_user()));
        assert!(session.is_authenticated());
    }

    #[test]
    fn authenticated_session_always_holds_a_user() {
        let session = Session::new();
        session.log_in(test_user());

        assert_eq!(session.is_authenticated(), session.current_user().is_some());
    }

    #[test]
    fn forced_expiry_clears_an_authenticated_session() {
        let session = Session::new();
        session.log_in(test_user());

        session.force_expire();

        assert_eq!(session.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn forced_expiry_notifies_observers_with_session_expired() {
        let session = Session::new();
        session.log_in(test_user());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.subscribe(move |reason| sink.lock().unwrap().push(reason));

        session.force_expire();

        assert_eq!(*seen.lock().unwrap(), vec![LogoutReason::SessionExpired]);
    }

    #[test]
    fn repeated_expiry_notifies_only_once() {
        let session = Session::new();
        session.log_in(test_user());

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        session.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        session.force_expire();
        session.force_expire();
        session.force_expire();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribed_observer_is_not_notified() {
        let session = Session::new();
        session.log_in(test_user());

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let id = session.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        session.unsubscribe(id);
        session.force_expire();

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn attached_client_expires_session_on_unauthorized() {
        let session = Arc::new(Session::new());
        session.log_in(test_user());

        let client = ApiClient::new(Config::new("http://localhost:0")).unwrap();
        Session::attach(&session, &client);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.subscribe(move |reason| sink.lock().unwrap().push(reason));

        // Simulate the client receiving a 401 from any endpoint.
        client.notify_unauthorized();

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(*seen.lock().unwrap(), vec![LogoutReason::SessionExpired]);
    }
}
