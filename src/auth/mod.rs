use crate::api::{ApiClient, ApiResult, ReqwestTransport, Transport};
use crate::models::RegisterResponse;
use crate::session::SessionStore;
use leptos::prelude::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AuthState {
    pub is_authenticated: bool,
    pub username: Option<String>,
}

impl AuthState {
    pub fn from_session(session: &SessionStore) -> Self {
        Self {
            is_authenticated: session.is_authenticated(),
            username: session.username(),
        }
    }
}

/// `use_auth` was called with no `AuthProvider` above it. This is a wiring bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("use_auth() called outside of <AuthProvider/>")]
pub(crate) struct OutsideAuthProvider;

/// Reactive view of the session for the component tree.
///
/// State is read from the session store once, at construction; afterwards it only
/// changes through `login` and `logout` here.
#[derive(Clone)]
pub(crate) struct AuthContext<T: Transport = ReqwestTransport> {
    client: ApiClient<T>,
    state: RwSignal<AuthState>,
}

impl<T: Transport> AuthContext<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        let state = RwSignal::new(AuthState::from_session(client.session()));
        Self { client, state }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.is_authenticated)
    }

    pub fn username(&self) -> Option<String> {
        self.state.with(|s| s.username.clone())
    }

    pub fn state_untracked(&self) -> AuthState {
        self.state.get_untracked()
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        let res = self.client.login(username, password).await?;
        self.state.set(AuthState {
            is_authenticated: true,
            username: Some(res.username),
        });
        Ok(())
    }

    /// Registration does not log the user in.
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<RegisterResponse> {
        self.client.register(username, password).await
    }

    pub fn logout(&self) {
        self.client.logout();
        self.state.set(AuthState::default());
    }
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let app_state = expect_context::<crate::state::AppContext>();
    provide_context(AuthContext::new(app_state.0.api_client.clone()));

    children()
}

pub(crate) fn try_use_auth() -> Result<AuthContext, OutsideAuthProvider> {
    use_context::<AuthContext>().ok_or(OutsideAuthProvider)
}

/// Panics outside `<AuthProvider/>`; there is no sensible recovery from miswired providers.
pub(crate) fn use_auth() -> AuthContext {
    match try_use_auth() {
        Ok(auth) => auth,
        Err(e) => panic!("{e}"),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::api::FakeTransport;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn auth() -> (AuthContext<FakeTransport>, FakeTransport, SessionStore) {
        let transport = FakeTransport::default();
        let session = SessionStore::new(Arc::new(MemoryStorage::default()));
        let client =
            ApiClient::with_transport("http://localhost:3000/api", session.clone(), transport.clone());
        (AuthContext::new(client), transport, session)
    }

    #[test]
    fn test_initial_state_mirrors_session() {
        let transport = FakeTransport::default();
        let session = SessionStore::new(Arc::new(MemoryStorage::default()));
        session.set_session("abc123", "alice");
        let client = ApiClient::with_transport("http://x", session, transport);

        let a = AuthContext::new(client);
        assert_eq!(
            a.state_untracked(),
            AuthState {
                is_authenticated: true,
                username: Some("alice".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_login_sets_state_from_response() {
        let (a, t, session) = auth();
        t.respond(200, r#"{"message": "ok", "token": "abc123", "username": "alice"}"#);

        a.login("alice", "pw").await.expect("login should succeed");
        let s = a.state_untracked();
        assert!(s.is_authenticated);
        assert_eq!(s.username.as_deref(), Some("alice"));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_propagates_and_keeps_state() {
        let (a, t, _) = auth();
        t.respond(401, r#"{"error": "Invalid credentials"}"#);

        let err = a.login("alice", "bad").await.unwrap_err();
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(a.state_untracked(), AuthState::default());
    }

    #[tokio::test]
    async fn test_register_leaves_user_logged_out() {
        let (a, t, session) = auth();
        t.respond(201, r#"{"message": "created", "userId": 1}"#);

        a.register("alice", "pw").await.expect("register should succeed");
        assert!(!a.state_untracked().is_authenticated);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_state_and_session() {
        let (a, t, session) = auth();
        t.respond(200, r#"{"message": "ok", "token": "abc123", "username": "alice"}"#);
        a.login("alice", "pw").await.unwrap();

        a.logout();
        a.logout();
        assert_eq!(a.state_untracked(), AuthState::default());
        assert!(!session.is_authenticated());
        assert!(session.username().is_none());
    }

    #[test]
    fn test_use_auth_outside_provider_is_structural_error() {
        assert_eq!(try_use_auth().err(), Some(OutsideAuthProvider));
    }
}
