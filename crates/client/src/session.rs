//! Session management.
//!
//! A single [`SessionManager`] is built at startup and shared through context.
//! It owns the tokens (persisted in storage), refreshes them before they expire
//! and caches the signed-in user's profile.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use spacedash_shared::{AuthError, User};

use crate::api_client::TokenSource;
use crate::cache::TtlCache;
use crate::identity::{IdentityProvider, SignUpOutcome, SignUpRequest, Tokens};
use crate::storage::Storage;

const SESSION_KEY: &str = "spacedash_session";
const PROFILE_KEY: &str = "current_user";

/// Refresh when the access token has less than this left.
const REFRESH_MARGIN_SECS: i64 = 60;

pub const PROFILE_TTL_MINUTES: i64 = 10;

pub struct SessionManager {
    identity: Arc<dyn IdentityProvider>,
    storage: Arc<dyn Storage>,
    profiles: TtlCache,
    tokens: Mutex<Option<Tokens>>,
}

impl SessionManager {
    /// Restore any persisted session from `storage`.
    pub fn new(identity: Arc<dyn IdentityProvider>, storage: Arc<dyn Storage>) -> Self {
        let tokens = storage
            .load_raw(SESSION_KEY)
            .and_then(|raw| serde_json::from_str::<Tokens>(&raw).ok());
        if tokens.is_some() {
            crate::log_info!("Restored persisted session");
        }
        Self {
            identity,
            profiles: TtlCache::new(storage.clone(), "profile"),
            storage,
            tokens: Mutex::new(tokens),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.lock().map(|t| t.is_some()).unwrap_or(false)
    }

    fn snapshot(&self) -> Option<Tokens> {
        self.tokens.lock().ok().and_then(|t| t.clone())
    }

    fn store(&self, tokens: Option<Tokens>) {
        match &tokens {
            Some(t) => {
                if let Ok(json) = serde_json::to_string(t) {
                    self.storage.save_raw(SESSION_KEY, &json);
                }
            }
            None => self.storage.remove(SESSION_KEY),
        }
        if let Ok(mut slot) = self.tokens.lock() {
            *slot = tokens;
        }
    }

    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        let outcome = self.identity.sign_up(req).await?;
        crate::log_info!(
            "Signed up {} (confirmed: {})",
            req.username,
            outcome.user_confirmed
        );
        Ok(outcome)
    }

    pub async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), AuthError> {
        self.identity.confirm_sign_up(username, code).await
    }

    /// Sign in and load the user's profile.
    ///
    /// The session only persists once the profile has loaded; any failure
    /// leaves the manager signed out.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let tokens = self.identity.sign_in(username, password).await?;
        self.profiles.invalidate(PROFILE_KEY);
        self.store(Some(tokens));
        match self.current_user().await {
            Ok(user) => {
                crate::log_info!("Signed in as {}", username);
                Ok(user)
            }
            Err(e) => {
                crate::log_error!("Profile load after sign-in failed: {}", e);
                self.profiles.invalidate(PROFILE_KEY);
                self.store(None);
                Err(e)
            }
        }
    }

    /// Drop the local session. The remote sign-out is best effort.
    pub async fn sign_out(&self) {
        if let Some(tokens) = self.snapshot() {
            if let Err(e) = self.identity.sign_out(&tokens.access_token).await {
                crate::log_warn!("Remote sign-out failed: {}", e);
            }
        }
        self.profiles.invalidate(PROFILE_KEY);
        self.store(None);
    }

    /// Current tokens, refreshed first if they are about to expire.
    ///
    /// A failed refresh ends the session.
    pub async fn tokens(&self) -> Option<Tokens> {
        let tokens = self.snapshot()?;
        if !tokens.expires_within(Duration::seconds(REFRESH_MARGIN_SECS), Utc::now()) {
            return Some(tokens);
        }

        let Some(refresh_token) = tokens.refresh_token.clone() else {
            crate::log_warn!("Session expired and cannot be refreshed");
            self.store(None);
            return None;
        };

        match self.identity.refresh(&refresh_token).await {
            Ok(fresh) => {
                crate::log_debug!("Refreshed access token");
                self.store(Some(fresh.clone()));
                Some(fresh)
            }
            Err(e) => {
                crate::log_error!("Token refresh failed: {}", e);
                self.profiles.invalidate(PROFILE_KEY);
                self.store(None);
                None
            }
        }
    }

    /// The signed-in user, from cache when fresh.
    pub async fn current_user(&self) -> Result<User, AuthError> {
        if let Some(user) = self.profiles.get::<User>(PROFILE_KEY) {
            return Ok(user);
        }
        let tokens = self.tokens().await.ok_or(AuthError::NotSignedIn)?;
        let user = self.identity.current_user(&tokens).await?;
        self.profiles
            .put(PROFILE_KEY, &user, Duration::minutes(PROFILE_TTL_MINUTES));
        Ok(user)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TokenSource for SessionManager {
    async fn access_token(&self) -> Option<String> {
        self.tokens().await.map(|t| t.access_token)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use spacedash_shared::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory identity provider that issues tokens with a configurable lifetime.
    #[derive(Default)]
    pub(crate) struct FakeIdentity {
        pub lifetime_secs: i64,
        pub refresh_fails: bool,
        pub profile_fails: bool,
        pub sign_ins: AtomicUsize,
        pub refreshes: AtomicUsize,
        pub profile_loads: AtomicUsize,
        pub sign_outs: AtomicUsize,
    }

    impl FakeIdentity {
        pub(crate) fn with_lifetime(lifetime_secs: i64) -> Self {
            Self {
                lifetime_secs,
                ..Default::default()
            }
        }

        fn issue(&self, n: usize, lifetime_secs: i64) -> Tokens {
            Tokens {
                access_token: format!("access-{n}"),
                id_token: format!("id-{n}"),
                refresh_token: Some("refresh".to_string()),
                expires_at: Utc::now() + Duration::seconds(lifetime_secs),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn sign_up(&self, _req: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
            Ok(SignUpOutcome {
                user_confirmed: false,
            })
        }

        async fn confirm_sign_up(&self, _username: &str, _code: &str) -> Result<(), AuthError> {
            Ok(())
        }

        async fn sign_in(&self, username: &str, password: &str) -> Result<Tokens, AuthError> {
            if password != "correct horse" {
                return Err(AuthError::Provider {
                    code: "NotAuthorizedException".to_string(),
                    message: format!("Incorrect username or password for {username}"),
                });
            }
            let n = self.sign_ins.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(self.issue(n, self.lifetime_secs))
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<Tokens, AuthError> {
            let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
            if self.refresh_fails {
                return Err(AuthError::Provider {
                    code: "NotAuthorizedException".to_string(),
                    message: "Refresh Token has expired".to_string(),
                });
            }
            Ok(self.issue(100 + n, 3600))
        }

        async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
            self.sign_outs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn current_user(&self, _tokens: &Tokens) -> Result<User, AuthError> {
            self.profile_loads.fetch_add(1, Ordering::SeqCst);
            if self.profile_fails {
                return Err(AuthError::Network("connection reset".to_string()));
            }
            Ok(User {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
                first_name: Some("Ana".to_string()),
                last_name: None,
                role: Some(Role::SystemAdmin),
            })
        }
    }

    fn manager(identity: Arc<FakeIdentity>, storage: Arc<MemoryStorage>) -> SessionManager {
        SessionManager::new(identity, storage)
    }

    #[tokio::test]
    async fn sign_in_authenticates_and_caches_profile() {
        let identity = Arc::new(FakeIdentity::with_lifetime(3600));
        let session = manager(identity.clone(), Arc::new(MemoryStorage::new()));
        assert!(!session.is_authenticated());

        let user = session.sign_in("ana", "correct horse").await.unwrap();
        assert!(session.is_authenticated());
        assert!(user.is_system_admin());

        session.current_user().await.unwrap();
        assert_eq!(identity.profile_loads.load(Ordering::SeqCst), 1);
        assert_eq!(session.access_token().await.as_deref(), Some("access-1"));
    }

    #[tokio::test]
    async fn wrong_password_leaves_session_signed_out() {
        let identity = Arc::new(FakeIdentity::with_lifetime(3600));
        let session = manager(identity, Arc::new(MemoryStorage::new()));

        let err = session.sign_in("ana", "hunter2").await.unwrap_err();
        assert!(matches!(err, AuthError::Provider { .. }));
        assert!(!session.is_authenticated());
        assert_eq!(session.access_token().await, None);
    }

    #[tokio::test]
    async fn expiring_tokens_are_refreshed_once() {
        let identity = Arc::new(FakeIdentity::with_lifetime(30));
        let session = manager(identity.clone(), Arc::new(MemoryStorage::new()));
        session.sign_in("ana", "correct horse").await.unwrap();

        // The profile load after sign-in already refreshed; the new token lasts an hour.
        assert_eq!(session.access_token().await.as_deref(), Some("access-101"));
        assert_eq!(session.access_token().await.as_deref(), Some("access-101"));
        assert_eq!(identity.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_refresh_ends_the_session() {
        let identity = Arc::new(FakeIdentity {
            lifetime_secs: 5,
            refresh_fails: true,
            ..Default::default()
        });
        let session = manager(identity, Arc::new(MemoryStorage::new()));
        session.sign_in("ana", "correct horse").await.unwrap_err();

        assert!(!session.is_authenticated());
        assert_eq!(session.access_token().await, None);
    }

    #[tokio::test]
    async fn session_survives_restart_and_sign_out_clears_it() {
        let identity = Arc::new(FakeIdentity::with_lifetime(3600));
        let storage = Arc::new(MemoryStorage::new());

        let first = manager(identity.clone(), storage.clone());
        first.sign_in("ana", "correct horse").await.unwrap();

        let second = manager(identity.clone(), storage.clone());
        assert!(second.is_authenticated());

        second.sign_out().await;
        assert!(!second.is_authenticated());
        assert_eq!(identity.sign_outs.load(Ordering::SeqCst), 1);
        assert!(!manager(identity, storage).is_authenticated());
    }

    #[tokio::test]
    async fn failed_profile_load_does_not_persist_the_session() {
        let identity = Arc::new(FakeIdentity {
            lifetime_secs: 3600,
            profile_fails: true,
            ..Default::default()
        });
        let storage = Arc::new(MemoryStorage::new());
        let session = manager(identity.clone(), storage.clone());

        let err = session.sign_in("ana", "correct horse").await.unwrap_err();

        assert!(matches!(err, AuthError::Network(_)));
        assert!(!session.is_authenticated());
        assert_eq!(session.access_token().await, None);
        assert!(!manager(identity, storage).is_authenticated());
    }
}
