//! The durable side of the two session partitions.
//!
//! Only `auth` and `adminAuth` survive a restart. They are written here,
//! after the reducer has run, and read back once when the store is built.

use std::sync::Arc;

use averycare_core::action::{Action, Phase};
use averycare_core::session::{AdminSession, Principal, Session, TokenStore};
use averycare_core::slice::{AdminAuthAction, AdminAuthState, AuthAction, AuthState};
use averycare_core::storage::KeyValueStore;
use averycare_core::Result;

#[derive(Clone)]
pub struct SessionPersistence {
    user: TokenStore,
    admin: TokenStore,
}

impl SessionPersistence {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            user: TokenStore::new(Principal::User, storage.clone()),
            admin: TokenStore::new(Principal::Admin, storage),
        }
    }

    pub fn tokens(&self, principal: Principal) -> &TokenStore {
        match principal {
            Principal::User => &self.user,
            Principal::Admin => &self.admin,
        }
    }

    /// Rebuilds both session partitions from durable storage.
    pub fn restore(&self) -> (AuthState, AdminAuthState) {
        let mut user: Option<Session> = self.user.identity();
        if let Some(session) = user.as_mut() {
            if session.token().is_none() {
                session.token = self.user.get();
            }
        }

        let admin_email: Option<String> = self.admin.identity();
        let admin = AdminAuthState::hydrate(self.admin.get(), admin_email);

        tracing::debug!(
            user_authenticated = user.as_ref().and_then(Session::token).is_some(),
            admin_authenticated = admin.is_authenticated,
            "Restored sessions"
        );
        (AuthState::hydrate(user), admin)
    }

    /// Writes the durable counterpart of a session transition.
    ///
    /// Storage failures are logged and do not undo the transition.
    pub fn persist(&self, action: &Action) {
        let result = match action {
            Action::Auth(AuthAction::Login(Phase::Success(session)))
            | Action::Auth(AuthAction::VerifyOtp(Phase::Success(session))) => {
                self.save_user(session)
            }
            Action::Auth(AuthAction::Logout) => {
                tracing::info!("User logged out");
                self.user.clear()
            }
            Action::AdminAuth(AdminAuthAction::AdminLogin(Phase::Success(session))) => {
                self.save_admin(session)
            }
            Action::AdminAuth(AdminAuthAction::AdminLogout) => {
                tracing::info!("Admin logged out");
                self.admin.clear()
            }
            _ => return,
        };

        if let Err(e) = result {
            tracing::warn!(action = %action.type_name(), "Failed to persist session: {}", e);
        }
    }

    fn save_user(&self, session: &Session) -> Result<()> {
        match session.token() {
            Some(token) => {
                tracing::info!(email = ?session.email, "User session stored");
                self.user.set(token, session)
            }
            None => self.user.set_identity(session),
        }
    }

    fn save_admin(&self, session: &AdminSession) -> Result<()> {
        tracing::info!(email = %session.email, "Admin session stored");
        self.admin.set(&session.token, &session.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, String>>);

    impl KeyValueStore for MapStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }
        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.lock().unwrap().insert(key.to_string(), value.to_string());
            Ok(())
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn session() -> Session {
        Session {
            name: Some("A".into()),
            role: Some("admin".into()),
            token: Some("t1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_login_then_restore() {
        let storage = Arc::new(MapStore::default());
        let persistence = SessionPersistence::new(storage.clone());
        persistence.persist(&AuthAction::Login(Phase::Success(session())).into());

        let blob = storage.get("user").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["token"], "t1");
        assert_eq!(value["role"], "admin");
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("t1"));

        let (auth, admin) = SessionPersistence::new(storage).restore();
        assert!(auth.is_authenticated);
        assert_eq!(auth.token(), Some("t1"));
        assert!(!admin.is_authenticated);
    }

    #[test]
    fn test_logouts_are_independent() {
        let storage = Arc::new(MapStore::default());
        let persistence = SessionPersistence::new(storage.clone());
        persistence.persist(&AuthAction::Login(Phase::Success(session())).into());
        persistence.persist(
            &AdminAuthAction::AdminLogin(Phase::Success(AdminSession {
                email: "ops@example.com".into(),
                token: "adm".into(),
            }))
            .into(),
        );

        persistence.persist(&AuthAction::Logout.into());
        assert!(storage.get("user").unwrap().is_none());
        assert!(storage.get("token").unwrap().is_none());
        assert_eq!(storage.get("adminToken").unwrap().as_deref(), Some("adm"));

        let (_, admin) = persistence.restore();
        assert_eq!(admin.email.as_deref(), Some("ops@example.com"));
        assert!(admin.is_authenticated);
    }

    #[test]
    fn test_verify_without_token_keeps_stored_token() {
        let storage = Arc::new(MapStore::default());
        storage.set("token", "old").unwrap();
        let persistence = SessionPersistence::new(storage.clone());

        let verified = Session {
            email: Some("a@example.com".into()),
            verified: true,
            ..Default::default()
        };
        persistence.persist(&AuthAction::VerifyOtp(Phase::Success(verified)).into());

        assert_eq!(storage.get("token").unwrap().as_deref(), Some("old"));
        let (auth, _) = persistence.restore();
        assert!(auth.verified);
        assert_eq!(auth.token(), Some("old"));
    }
}
