//! Session context shared with every view.
//!
//! `AuthProvider` builds the [`SessionManager`], the REST client and the
//! article feed once, restores any persisted session and exposes them through
//! [`AuthContext`].

use std::sync::Arc;

use dioxus::prelude::*;
use spacedash_shared::{AuthError, User};

use crate::api_client::ApiClient;
use crate::articles::ArticleFeed;
use crate::cache::TtlCache;
use crate::config::AppConfig;
use crate::identity::{CognitoIdentity, SignUpOutcome, SignUpRequest};
use crate::session::SessionManager;
use crate::storage::{PlatformStorage, Storage};
use crate::stores::{clear_current_user, set_current_user, CURRENT_USER};

/// Authentication context provided to the app
#[derive(Clone)]
pub struct AuthContext {
    pub config: Arc<AppConfig>,
    session: Arc<SessionManager>,
    api: ApiClient,
    articles: ArticleFeed,
    /// Mirrors `session.is_authenticated()` so views re-render on change.
    pub authenticated: Signal<bool>,
}

impl AuthContext {
    pub fn new(config: AppConfig, storage: Arc<dyn Storage>) -> Self {
        let identity = Arc::new(CognitoIdentity::new(&config.identity));
        let session = Arc::new(SessionManager::new(identity, storage.clone()));
        let api = ApiClient::new(config.api_base_url.clone(), session.clone());
        let articles = ArticleFeed::new(
            api.clone(),
            TtlCache::new(storage, "articles"),
            config.articles_url.clone(),
        );
        Self {
            authenticated: Signal::new(session.is_authenticated()),
            config: Arc::new(config),
            session,
            api,
            articles,
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api.clone()
    }

    pub fn articles(&self) -> ArticleFeed {
        self.articles.clone()
    }

    pub fn session(&self) -> Arc<SessionManager> {
        self.session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.read()
    }

    pub async fn sign_in(&mut self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self.session.sign_in(username, password).await?;
        set_current_user(user.clone());
        self.authenticated.set(true);
        Ok(user)
    }

    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        self.session.sign_up(req).await
    }

    pub async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), AuthError> {
        self.session.confirm_sign_up(username, code).await
    }

    pub async fn sign_out(&mut self) {
        self.session.sign_out().await;
        clear_current_user();
        self.authenticated.set(false);
    }

    /// Load the profile into the store, ending the session if it is no longer valid.
    pub async fn load_profile(&mut self) {
        match self.session.current_user().await {
            Ok(user) => set_current_user(user),
            Err(e) => {
                crate::log_warn!("Could not load profile: {}", e);
                clear_current_user();
                self.authenticated.set(self.session.is_authenticated());
            }
        }
    }
}

/// Provider component that sets up auth context
#[component]
pub fn AuthProvider(config: AppConfig, children: Element) -> Element {
    let auth = use_context_provider(|| {
        AuthContext::new(config.clone(), Arc::new(PlatformStorage::new()))
    });

    use_hook(move || {
        let mut auth = auth.clone();
        if auth.is_authenticated() && CURRENT_USER.read().is_none() {
            spawn(async move { auth.load_profile().await });
        }
    });

    children
}
