use crate::core::password::{hash_password_blocking, verify_password_blocking, PasswordPolicy};
use crate::core::store::SnapshotStore;
use crate::core::Storage;
use crate::domain::model::{SessionView, User, UserId, UserView};
use crate::domain::requests::{
    validate_username, LoginRequest, PasswordUpdate, ProfileUpdate, SignupRequest,
};
use crate::utils::error::{Result, TradeError};
use crate::utils::validation::Validate;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

pub const ACCOUNTS_SNAPSHOT: &str = "accounts.json";

/// Two weeks, the usual lifetime of a browser session cookie.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountTables {
    next_user_id: UserId,
    users: BTreeMap<UserId, User>,
}

impl AccountTables {
    fn by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|user| user.username == username)
    }

    fn user(&self, id: UserId) -> Result<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| TradeError::not_found("user", id))
    }

    fn user_mut(&mut self, id: UserId) -> Result<&mut User> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| TradeError::not_found("user", id))
    }

    fn ensure_username_free(&self, username: &str, except: Option<UserId>) -> Result<()> {
        match self.by_username(username) {
            Some(existing) if Some(existing.id) != except => Err(TradeError::conflict(
                "A user with that username already exists",
            )),
            _ => Ok(()),
        }
    }

    fn insert(&mut self, mut user: User) -> User {
        self.next_user_id += 1;
        user.id = self.next_user_id;
        self.users.insert(user.id, user.clone());
        user
    }
}

#[derive(Debug, Clone, Copy)]
struct Session {
    user_id: UserId,
    issued_at: Instant,
}

/// User accounts and bearer-token sessions.
///
/// Sessions live in memory only; a restart logs everyone out. A session
/// expires `session_ttl` after login and is revoked when its user changes
/// password.
pub struct AccountService<S: Storage> {
    store: SnapshotStore<AccountTables, S>,
    sessions: RwLock<HashMap<String, Session>>,
    policy: PasswordPolicy,
    session_ttl: Duration,
}

impl<S: Storage> AccountService<S> {
    pub async fn open(storage: S, policy: PasswordPolicy) -> Result<Self> {
        let store = SnapshotStore::open(storage, ACCOUNTS_SNAPSHOT).await?;
        Ok(Self {
            store,
            sessions: RwLock::new(HashMap::new()),
            policy,
            session_ttl: DEFAULT_SESSION_TTL,
        })
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    fn is_expired(&self, session: &Session, now: Instant) -> bool {
        now.duration_since(session.issued_at) >= self.session_ttl
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<UserView> {
        request.validate()?;
        self.policy
            .check("password", &request.password, &request.username)?;
        if request.password != request.password_repeat {
            return Err(TradeError::validation(
                "password_repeat",
                "The entered passwords must match",
            ));
        }

        let password_hash = hash_password_blocking(request.password).await?;
        let user = User {
            id: 0,
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password_hash,
            is_staff: false,
            date_joined: Utc::now(),
        };

        let user = self
            .store
            .write(move |tables| {
                tables.ensure_username_free(&user.username, None)?;
                Ok(tables.insert(user))
            })
            .await?;

        tracing::info!("👤 Registered user '{}' (id={})", user.username, user.id);
        Ok(UserView::from(&user))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<SessionView> {
        let user = self
            .store
            .read(|tables| tables.by_username(&request.username).cloned())
            .await;

        // 帳號不存在時仍做一次雜湊比對，回應時間不洩漏帳號是否存在
        let encoded = user.as_ref().map(|user| user.password_hash.clone());
        let verified = verify_password_blocking(request.password, encoded).await;
        let user = user.filter(|_| verified).ok_or_else(|| {
            tracing::warn!("🔒 Failed login for '{}'", request.username);
            TradeError::AuthenticationFailed
        })?;

        let token = Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        {
            let mut sessions = self.sessions.write().await;
            sessions.retain(|_, session| !self.is_expired(session, now));
            sessions.insert(
                token.clone(),
                Session {
                    user_id: user.id,
                    issued_at: now,
                },
            );
        }

        tracing::info!("🔓 User '{}' logged in", user.username);
        Ok(SessionView {
            token,
            user: UserView::from(&user),
        })
    }

    /// Resolves a session token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let session = self
            .sessions
            .read()
            .await
            .get(token)
            .copied()
            .ok_or(TradeError::NotAuthenticated)?;

        if self.is_expired(&session, Instant::now()) {
            self.sessions.write().await.remove(token);
            tracing::debug!("Session of user {} expired", session.user_id);
            return Err(TradeError::NotAuthenticated);
        }
        let user_id = session.user_id;

        self.store
            .read(|tables| tables.user(user_id).cloned())
            .await
            .map_err(|_| TradeError::NotAuthenticated)
    }

    pub async fn profile(&self, user_id: UserId) -> Result<UserView> {
        self.store
            .read(|tables| tables.user(user_id).map(UserView::from))
            .await
    }

    pub async fn update_profile(&self, user_id: UserId, update: ProfileUpdate) -> Result<UserView> {
        update.validate()?;
        self.store
            .write(move |tables| {
                if let Some(username) = &update.username {
                    tables.ensure_username_free(username, Some(user_id))?;
                }

                let user = tables.user_mut(user_id)?;
                if let Some(username) = update.username {
                    user.username = username;
                }
                if let Some(first_name) = update.first_name {
                    user.first_name = first_name;
                }
                if let Some(last_name) = update.last_name {
                    user.last_name = last_name;
                }
                if let Some(email) = update.email {
                    user.email = email;
                }
                Ok(UserView::from(&*user))
            })
            .await
    }

    pub async fn logout(&self, token: &str) {
        if let Some(session) = self.sessions.write().await.remove(token) {
            tracing::info!("👋 User {} logged out", session.user_id);
        }
    }

    /// Changes the password and revokes every session of the user.
    pub async fn update_password(&self, user_id: UserId, update: PasswordUpdate) -> Result<UserView> {
        let user = self.store.read(|tables| tables.user(user_id).cloned()).await?;

        if !verify_password_blocking(update.old_password, Some(user.password_hash)).await {
            return Err(TradeError::validation("old_password", "Incorrect password"));
        }
        self.policy
            .check("new_password", &update.new_password, &user.username)?;

        let password_hash = hash_password_blocking(update.new_password).await?;
        let view = self
            .store
            .write(move |tables| {
                let user = tables.user_mut(user_id)?;
                user.password_hash = password_hash;
                Ok(UserView::from(&*user))
            })
            .await?;

        let revoked = self.revoke_sessions(user_id).await;
        tracing::info!(
            "🔑 Password changed for '{}', {} session(s) revoked",
            view.username,
            revoked
        );
        Ok(view)
    }

    async fn revoke_sessions(&self, user_id: UserId) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.user_id != user_id);
        before - sessions.len()
    }

    /// Creates a staff account, or promotes and resets an existing one.
    pub async fn create_admin(&self, username: &str, email: &str, password: &str) -> Result<UserView> {
        validate_username(username)?;
        self.policy.check("password", password, username)?;

        let password_hash = hash_password_blocking(password.to_string()).await?;
        let username = username.to_string();
        let email = email.to_string();

        let user = self
            .store
            .write(move |tables| {
                if let Some(existing) = tables.by_username(&username).map(|u| u.id) {
                    let user = tables.user_mut(existing)?;
                    user.is_staff = true;
                    user.password_hash = password_hash;
                    if !email.is_empty() {
                        user.email = email;
                    }
                    return Ok(user.clone());
                }

                Ok(tables.insert(User {
                    id: 0,
                    username,
                    first_name: String::new(),
                    last_name: String::new(),
                    email,
                    password_hash,
                    is_staff: true,
                    date_joined: Utc::now(),
                }))
            })
            .await?;

        tracing::info!("🛡️ Staff account ready: '{}' (id={})", user.username, user.id);
        Ok(UserView::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;

    async fn service() -> AccountService<MemoryStorage> {
        AccountService::open(MemoryStorage::new(), PasswordPolicy::default())
            .await
            .unwrap()
    }

    fn signup(username: &str, password: &str, repeat: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: password.to_string(),
            password_repeat: repeat.to_string(),
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_login_and_authenticate() {
        let service = service().await;
        let user = service
            .signup(signup("jane", "Supply-Chain-42", "Supply-Chain-42"))
            .await
            .unwrap();
        assert_eq!(user.id, 1);

        let session = service.login(login("jane", "Supply-Chain-42")).await.unwrap();
        assert_eq!(session.user, user);

        let current = service.authenticate(&session.token).await.unwrap();
        assert_eq!(current.username, "jane");
        assert!(!current.is_staff);

        service.logout(&session.token).await;
        assert!(matches!(
            service.authenticate(&session.token).await.unwrap_err(),
            TradeError::NotAuthenticated
        ));
    }

    #[tokio::test]
    async fn test_signup_rejects_mismatch_weak_and_duplicate() {
        let service = service().await;

        let err = service
            .signup(signup("jane", "Supply-Chain-42", "Supply-Chain-43"))
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::Validation { ref field, .. } if field == "password_repeat"));

        let err = service.signup(signup("jane", "123", "123")).await.unwrap_err();
        assert!(matches!(err, TradeError::Validation { ref field, .. } if field == "password"));

        service
            .signup(signup("jane", "Supply-Chain-42", "Supply-Chain-42"))
            .await
            .unwrap();
        let err = service
            .signup(signup("jane", "Other-Secret-77", "Other-Secret-77"))
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_wrong_credentials_fail() {
        let service = service().await;
        service
            .signup(signup("jane", "Supply-Chain-42", "Supply-Chain-42"))
            .await
            .unwrap();

        assert!(matches!(
            service.login(login("jane", "nope")).await.unwrap_err(),
            TradeError::AuthenticationFailed
        ));
        assert!(matches!(
            service.login(login("ghost", "Supply-Chain-42")).await.unwrap_err(),
            TradeError::AuthenticationFailed
        ));
    }

    #[tokio::test]
    async fn test_update_password_checks_old_password() {
        let service = service().await;
        let user = service
            .signup(signup("jane", "Supply-Chain-42", "Supply-Chain-42"))
            .await
            .unwrap();

        let err = service
            .update_password(
                user.id,
                PasswordUpdate {
                    old_password: "wrong".to_string(),
                    new_password: "Brand-New-Pass-1".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::Validation { ref field, .. } if field == "old_password"));

        service
            .update_password(
                user.id,
                PasswordUpdate {
                    old_password: "Supply-Chain-42".to_string(),
                    new_password: "Brand-New-Pass-1".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(service.login(login("jane", "Supply-Chain-42")).await.is_err());
        assert!(service.login(login("jane", "Brand-New-Pass-1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile_keeps_usernames_unique() {
        let service = service().await;
        let jane = service
            .signup(signup("jane", "Supply-Chain-42", "Supply-Chain-42"))
            .await
            .unwrap();
        service
            .signup(signup("john", "Supply-Chain-42", "Supply-Chain-42"))
            .await
            .unwrap();

        let err = service
            .update_profile(
                jane.id,
                ProfileUpdate {
                    username: Some("john".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::Conflict { .. }));

        let updated = service
            .update_profile(
                jane.id,
                ProfileUpdate {
                    last_name: Some("Smith".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.username, "jane");
    }

    #[tokio::test]
    async fn test_create_admin_promotes_existing_user() {
        let service = service().await;
        let jane = service
            .signup(signup("jane", "Supply-Chain-42", "Supply-Chain-42"))
            .await
            .unwrap();

        let admin = service
            .create_admin("jane", "", "Back-Office-99")
            .await
            .unwrap();
        assert_eq!(admin.id, jane.id);
        assert_eq!(admin.email, "jane@example.com");

        let session = service.login(login("jane", "Back-Office-99")).await.unwrap();
        assert!(service.authenticate(&session.token).await.unwrap().is_staff);
    }

    #[tokio::test]
    async fn test_password_change_revokes_sessions() {
        let service = service().await;
        let user = service
            .signup(signup("jane", "Supply-Chain-42", "Supply-Chain-42"))
            .await
            .unwrap();
        let first = service.login(login("jane", "Supply-Chain-42")).await.unwrap();
        let second = service.login(login("jane", "Supply-Chain-42")).await.unwrap();

        service
            .update_password(
                user.id,
                PasswordUpdate {
                    old_password: "Supply-Chain-42".to_string(),
                    new_password: "Brand-New-Pass-1".to_string(),
                },
            )
            .await
            .unwrap();

        for token in [&first.token, &second.token] {
            assert!(matches!(
                service.authenticate(token).await.unwrap_err(),
                TradeError::NotAuthenticated
            ));
        }
        let fresh = service.login(login("jane", "Brand-New-Pass-1")).await.unwrap();
        assert!(service.authenticate(&fresh.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_sessions_expire_and_are_pruned() {
        let service = service()
            .await
            .with_session_ttl(Duration::from_millis(50));
        service
            .signup(signup("jane", "Supply-Chain-42", "Supply-Chain-42"))
            .await
            .unwrap();

        let stale = service.login(login("jane", "Supply-Chain-42")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(matches!(
            service.authenticate(&stale.token).await.unwrap_err(),
            TradeError::NotAuthenticated
        ));

        let other = service.login(login("jane", "Supply-Chain-42")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        service.login(login("jane", "Supply-Chain-42")).await.unwrap();
        // 登入時順便清掉過期的 session
        let sessions = service.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(!sessions.contains_key(&other.token));
    }
}
