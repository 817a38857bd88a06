//! Session state shared by every request
//!
//! [`SessionManager`] owns the persisted token pair and guarantees that at
//! most one refresh call is in flight. The first request to see a 401 starts
//! the refresh; requests that arrive while it runs await the same shared
//! future and receive the same outcome.

use super::error::{ClientError, RefreshError};
use crate::types::RefreshResponse;
use async_trait::async_trait;
use carryit_core::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, USER_KEY};
use carryit_core::token::redact;
use carryit_core::{SignInView, TokenStore, UserProfile, UserRole};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Capacity of the session event channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Exchanges a refresh token for a new access token
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Call the refresh endpoint
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError>;
}

/// Authentication state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Refreshing,
}

/// Session lifecycle notifications for the hosting application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Tokens were stored after a login
    SignedIn,
    /// The access token was replaced by a refresh
    Refreshed,
    /// A refresh failed and the session was torn down
    Expired {
        entry_point: SignInView,
        reason: RefreshError,
    },
    /// The user logged out
    SignedOut { entry_point: SignInView },
}

impl SessionEvent {
    /// Sign-in view to show, if this event ended the session
    pub const fn entry_point(&self) -> Option<SignInView> {
        match self {
            Self::Expired { entry_point, .. } | Self::SignedOut { entry_point } => {
                Some(*entry_point)
            }
            Self::SignedIn | Self::Refreshed => None,
        }
    }
}

type RefreshFuture = Shared<BoxFuture<'static, Result<String, RefreshError>>>;

/// Shared session owned by the application's composition root
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
    in_flight: Mutex<Option<RefreshFuture>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a session over `store`, refreshing through `refresher`
    pub fn new(store: Arc<dyn TokenStore>, refresher: Arc<dyn TokenRefresher>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                store,
                refresher,
                in_flight: Mutex::new(None),
                events,
            }),
        }
    }

    /// Backing token store
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    /// Access token currently in storage
    pub fn access_token(&self) -> Option<String> {
        self.inner.store.get(ACCESS_TOKEN_KEY)
    }

    /// Refresh token currently in storage
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.store.get(REFRESH_TOKEN_KEY)
    }

    /// Stored profile of the signed-in user
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.inner.store.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Current state, derived from storage and the refresh slot
    pub fn state(&self) -> SessionState {
        if self.inner.lock_in_flight().is_some() {
            SessionState::Refreshing
        } else if self.access_token().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Store the token pair (and profile) from a successful login
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects a write
    pub fn establish(
        &self,
        access_token: &str,
        refresh_token: &str,
        user: Option<&UserProfile>,
    ) -> Result<(), ClientError> {
        let store = &self.inner.store;
        store.set(ACCESS_TOKEN_KEY, access_token)?;
        store.set(REFRESH_TOKEN_KEY, refresh_token)?;
        match user {
            Some(user) => store.set(USER_KEY, &serde_json::to_string(user)?)?,
            None => store.remove(USER_KEY)?,
        }

        info!(token = %redact(access_token), "Session established");
        self.inner.publish(SessionEvent::SignedIn);
        Ok(())
    }

    /// Refresh the access token, joining a refresh that is already running
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RefreshFailed`] if the refresh failed; the
    /// session has been torn down by then
    pub async fn refresh(&self) -> Result<String, ClientError> {
        let refresh = {
            let mut slot = self.inner.lock_in_flight();
            Inner::join_or_start(&self.inner, &mut slot)
        };

        Ok(refresh.await?)
    }

    /// Recover from a 401 received by a request sent with `sent_with`
    ///
    /// Returns the token the request should be replayed with. If another
    /// request already replaced the token, no new refresh is started.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RefreshFailed`] if a refresh was needed and
    /// failed
    pub async fn on_unauthorized(&self, sent_with: Option<&str>) -> Result<String, ClientError> {
        let refresh = {
            // A finished refresh stores its token before it releases the
            // slot, so the stale check below sees every completed refresh
            let mut slot = self.inner.lock_in_flight();
            if slot.is_none() {
                if let (Some(current), Some(sent)) = (self.access_token(), sent_with) {
                    if current != sent {
                        debug!("Access token already replaced, replaying without refresh");
                        return Ok(current);
                    }
                }
            }
            Inner::join_or_start(&self.inner, &mut slot)
        };

        Ok(refresh.await?)
    }

    /// End the session at the user's request
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the removal
    pub fn logout(&self) -> Result<SignInView, ClientError> {
        let entry_point = self.inner.entry_point();
        self.inner.store.remove_all(&SESSION_KEYS)?;

        info!(entry_point = entry_point.path(), "Signed out");
        self.inner.publish(SessionEvent::SignedOut { entry_point });
        Ok(entry_point)
    }
}

impl Inner {
    fn lock_in_flight(&self) -> MutexGuard<'_, Option<RefreshFuture>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn entry_point(&self) -> SignInView {
        let role = self
            .store
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str::<UserProfile>(&raw).ok())
            .map(|user| user.role)
            .filter(|role| *role != UserRole::Unknown);
        SignInView::for_role(role)
    }

    /// Join the running refresh, or start one on its own task
    ///
    /// The refresh runs detached from the caller, so it completes and
    /// releases the slot even if every waiter is dropped.
    fn join_or_start(inner: &Arc<Self>, slot: &mut Option<RefreshFuture>) -> RefreshFuture {
        if let Some(running) = slot.as_ref() {
            debug!("Joining in-flight token refresh");
            return running.clone();
        }

        debug!("Starting token refresh");
        let task = tokio::spawn(Self::run_refresh(Arc::clone(inner)));
        let started = async move {
            task.await
                .unwrap_or_else(|e| Err(RefreshError::Transport(format!("refresh task failed: {e}"))))
        }
        .boxed()
        .shared();
        *slot = Some(started.clone());
        started
    }

    async fn run_refresh(inner: Arc<Self>) -> Result<String, RefreshError> {
        let _release = SlotRelease(&inner);
        let outcome = inner.exchange().await;

        match &outcome {
            Ok(token) => {
                debug!(token = %redact(token), "Token refresh succeeded");
                inner.publish(SessionEvent::Refreshed);
            }
            Err(reason) => {
                warn!(error = %reason, "Token refresh failed, ending session");
                inner.teardown(reason.clone());
            }
        }

        outcome
    }

    async fn exchange(&self) -> Result<String, RefreshError> {
        let refresh_token = self
            .store
            .get(REFRESH_TOKEN_KEY)
            .ok_or(RefreshError::MissingRefreshToken)?;

        let response = self.refresher.refresh(&refresh_token).await?;

        self.store
            .set(ACCESS_TOKEN_KEY, &response.access_token)
            .map_err(|e| RefreshError::Storage(e.to_string()))?;

        if let Some(rotated) = response
            .refresh_token
            .as_deref()
            .filter(|t| !t.is_empty() && *t != refresh_token)
        {
            debug!("Refresh token rotated");
            self.store
                .set(REFRESH_TOKEN_KEY, rotated)
                .map_err(|e| RefreshError::Storage(e.to_string()))?;
        }

        Ok(response.access_token)
    }

    fn teardown(&self, reason: RefreshError) {
        let entry_point = self.entry_point();
        if let Err(e) = self.store.remove_all(&SESSION_KEYS) {
            warn!(error = %e, "Failed to clear session from storage");
        }
        self.publish(SessionEvent::Expired {
            entry_point,
            reason,
        });
    }
}

/// Empties the refresh slot when the refresh task ends, including by panic
struct SlotRelease<'a>(&'a Inner);

impl Drop for SlotRelease<'_> {
    fn drop(&mut self) {
        *self.0.lock_in_flight() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carryit_core::MemoryTokenStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Refresher that blocks until released and counts its calls
    struct GatedRefresher {
        calls: AtomicUsize,
        release: Notify,
        outcome: Result<RefreshResponse, RefreshError>,
    }

    impl GatedRefresher {
        fn new(outcome: Result<RefreshResponse, RefreshError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                release: Notify::new(),
                outcome,
            })
        }
    }

    #[async_trait]
    impl TokenRefresher for GatedRefresher {
        async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
            assert_eq!(refresh_token, "R1");
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            self.outcome.clone()
        }
    }

    fn granted(token: &str) -> Result<RefreshResponse, RefreshError> {
        Ok(RefreshResponse {
            access_token: token.to_string(),
            token_type: Some("bearer".to_string()),
            refresh_token: None,
        })
    }

    fn session_with(refresher: Arc<GatedRefresher>) -> SessionManager {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_tokens("A1", "R1"));
        SessionManager::new(store, refresher)
    }

    async fn wait_for_calls(refresher: &GatedRefresher, n: usize) {
        while refresher.calls.load(Ordering::SeqCst) < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_initial_state_follows_storage() {
        let refresher = GatedRefresher::new(granted("A2"));
        assert_eq!(session_with(refresher.clone()).state(), SessionState::Authenticated);

        let empty = SessionManager::new(Arc::new(MemoryTokenStore::new()), refresher);
        assert_eq!(empty.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_share_one_call() {
        let refresher = GatedRefresher::new(granted("A2"));
        let session = session_with(refresher.clone());

        let waiters: Vec<_> = (0..5)
            .map(|_| {
                let session = session.clone();
                tokio::spawn(async move { session.on_unauthorized(Some("A1")).await })
            })
            .collect();

        wait_for_calls(&refresher, 1).await;
        assert_eq!(session.state(), SessionState::Refreshing);
        // Give the remaining tasks time to join the running refresh
        tokio::time::sleep(Duration::from_millis(50)).await;
        refresher.release.notify_one();

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap().unwrap(), "A2");
        }
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.access_token().as_deref(), Some("A2"));
        assert_eq!(session.refresh_token().as_deref(), Some("R1"));
        assert_eq!(session.state(), SessionState::Authenticated);
    }

    #[tokio::test]
    async fn test_refresh_outlives_cancelled_caller() {
        let refresher = GatedRefresher::new(granted("A2"));
        let session = session_with(refresher.clone());

        let cancelled = tokio::time::timeout(
            Duration::from_millis(50),
            session.on_unauthorized(Some("A1")),
        )
        .await;
        assert!(cancelled.is_err());
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);

        refresher.release.notify_one();
        tokio::time::timeout(Duration::from_secs(1), async {
            while session.state() == SessionState::Refreshing {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(session.access_token().as_deref(), Some("A2"));
        // A late 401 for the old token reuses the finished refresh
        assert_eq!(session.on_unauthorized(Some("A1")).await.unwrap(), "A2");
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    /// Refresher that answers immediately and counts its calls
    #[derive(Default)]
    struct CountingRefresher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenRefresher for CountingRefresher {
        async fn refresh(&self, _refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 2;
            granted(&format!("A{call}"))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_401s_on_worker_threads_refresh_once() {
        let refresher = Arc::new(CountingRefresher::default());
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_tokens("A1", "R1"));
        let session = SessionManager::new(store, refresher.clone());

        let waiters: Vec<_> = (0..64)
            .map(|_| {
                let session = session.clone();
                tokio::spawn(async move { session.on_unauthorized(Some("A1")).await })
            })
            .collect();

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap().unwrap(), "A2");
        }
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_token_replays_without_refresh() {
        let refresher = GatedRefresher::new(granted("A3"));
        let session = session_with(refresher.clone());
        session.store().set(ACCESS_TOKEN_KEY, "A2").unwrap();

        let token = session.on_unauthorized(Some("A1")).await.unwrap();
        assert_eq!(token, "A2");
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_refresh_tears_down_session() {
        let rejected = RefreshError::Rejected {
            status: 400,
            message: "invalid refresh token".to_string(),
        };
        let refresher = GatedRefresher::new(Err(rejected.clone()));
        let session = session_with(refresher.clone());
        let admin: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 1, "email": "admin@carryit.app", "role": "admin"
        }))
        .unwrap();
        session.store().set(USER_KEY, &serde_json::to_string(&admin).unwrap()).unwrap();
        let mut events = session.subscribe();

        let leader = {
            let session = session.clone();
            tokio::spawn(async move { session.refresh().await })
        };
        wait_for_calls(&refresher, 1).await;
        let follower = {
            let session = session.clone();
            tokio::spawn(async move { session.on_unauthorized(Some("A1")).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        refresher.release.notify_one();

        for task in [leader, follower] {
            match task.await.unwrap() {
                Err(ClientError::RefreshFailed(reason)) => assert_eq!(reason, rejected),
                other => panic!("expected refresh failure, got {other:?}"),
            }
        }

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(session.refresh_token(), None);
        assert_eq!(session.user(), None);
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::Expired {
                entry_point: SignInView::Admin,
                reason: rejected,
            }
        );
    }

    #[tokio::test]
    async fn test_missing_refresh_token_fails_without_calling_backend() {
        let refresher = GatedRefresher::new(granted("A2"));
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        store.set(ACCESS_TOKEN_KEY, "A1").unwrap();
        let session = SessionManager::new(store, refresher.clone());

        let err = session.refresh().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::RefreshFailed(RefreshError::MissingRefreshToken)
        ));
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.access_token(), None);
    }

    #[tokio::test]
    async fn test_rotated_refresh_token_is_stored() {
        let refresher = GatedRefresher::new(Ok(RefreshResponse {
            access_token: "A2".to_string(),
            token_type: None,
            refresh_token: Some("R2".to_string()),
        }));
        refresher.release.notify_one();
        let session = session_with(refresher);

        assert_eq!(session.refresh().await.unwrap(), "A2");
        assert_eq!(session.refresh_token().as_deref(), Some("R2"));
    }

    #[tokio::test]
    async fn test_establish_and_logout() {
        let refresher = GatedRefresher::new(granted("A2"));
        let session = SessionManager::new(Arc::new(MemoryTokenStore::new()), refresher);
        let mut events = session.subscribe();

        let agent: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 9, "email": "agent@carryit.app", "role": "agent"
        }))
        .unwrap();
        session.establish("A1", "R1", Some(&agent)).unwrap();
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(session.user().map(|u| u.role), Some(UserRole::Agent));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedIn);

        assert_eq!(session.logout().unwrap(), SignInView::Agent);
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(
            events.recv().await.unwrap().entry_point(),
            Some(SignInView::Agent)
        );
    }
}
