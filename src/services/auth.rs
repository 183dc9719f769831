use log::{debug, info, warn};

use crate::{
    auth::{generate_api_key, PasswordHasher},
    error::AppError,
    models::{ApiKey, User},
    store::{ApiKeyRepository, Store, UserRepository},
};

/// Resolves an API key to the user it was issued to.
///
/// Runs on every authenticated request; nothing is cached, so a deleted user stops
/// resolving immediately. A key whose user row is gone is treated as an
/// authentication failure rather than a server error.
pub async fn resolve_principal(store: &dyn Store, token: &str) -> Result<User, AppError> {
    let key = store
        .find_api_key_by_token(token)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Invalid API key".into()))?;

    let user = store.find_user_by_id(key.user_id).await?;
    match user {
        Some(user) => {
            debug!("Resolved API key {} to user {}", key.api_key_id, user.user_id);
            Ok(user)
        }
        None => {
            warn!("API key {} points at missing user {}", key.api_key_id, key.user_id);
            Err(AppError::Unauthenticated("User not found".into()))
        }
    }
}

/// Registration and login.
pub struct AuthService<'a> {
    store: &'a dyn Store,
    hasher: &'a PasswordHasher,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a dyn Store, hasher: &'a PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Creates an account and issues its first API key.
    ///
    /// Email and username uniqueness are checked separately so each produces its
    /// own `Conflict` message; the store's unique constraints back both checks up
    /// against concurrent registrations.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, ApiKey), AppError> {
        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        if self.store.find_user_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".into()));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .store
            .create_user(username, email, &password_hash)
            .await?;
        let key = self.issue_key(&user).await?;

        info!("Registered user {}", user.user_id);
        Ok((user, key))
    }

    /// Checks credentials and issues a new API key. Earlier keys stay valid.
    ///
    /// An unknown email and a wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, ApiKey), AppError> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            self.hasher.burn_verification(password);
            warn!("Rejected login attempt");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!("Rejected login attempt");
            return Err(AppError::InvalidCredentials);
        }

        let key = self.issue_key(&user).await?;
        info!("User {} logged in", user.user_id);
        Ok((user, key))
    }

    async fn issue_key(&self, user: &User) -> Result<ApiKey, AppError> {
        self.store
            .create_api_key(user.user_id, &generate_api_key())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4).unwrap()
    }

    #[actix_rt::test]
    async fn test_register_then_resolve() {
        let store = MemoryStore::new();
        let hasher = hasher();
        let service = AuthService::new(&store, &hasher);

        let (user, key) = service
            .register("alice", "a@x.com", "secret123")
            .await
            .unwrap();
        assert_eq!(key.user_id, user.user_id);
        assert_ne!(user.password_hash, "secret123");

        let principal = resolve_principal(&store, &key.api_key).await.unwrap();
        assert_eq!(principal, user);
    }

    #[actix_rt::test]
    async fn test_register_conflicts() {
        let store = MemoryStore::new();
        let hasher = hasher();
        let service = AuthService::new(&store, &hasher);
        service.register("alice", "a@x.com", "secret123").await.unwrap();

        match service.register("alice2", "a@x.com", "secret123").await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Email already registered"),
            other => panic!("expected email conflict, got {:?}", other),
        }
        match service.register("alice", "b@x.com", "secret123").await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Username already taken"),
            other => panic!("expected username conflict, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_login_failures_look_identical() {
        let store = MemoryStore::new();
        let hasher = hasher();
        let service = AuthService::new(&store, &hasher);
        service.register("alice", "a@x.com", "secret123").await.unwrap();

        let wrong_password = service.login("a@x.com", "nope-nope").await.unwrap_err();
        let unknown_email = service.login("ghost@x.com", "secret123").await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[actix_rt::test]
    async fn test_login_issues_additional_key() {
        let store = MemoryStore::new();
        let hasher = hasher();
        let service = AuthService::new(&store, &hasher);
        let (user, first) = service.register("alice", "a@x.com", "secret123").await.unwrap();

        let (_, second) = service.login("a@x.com", "secret123").await.unwrap();
        assert_ne!(first.api_key, second.api_key);

        for key in [&first, &second] {
            let principal = resolve_principal(&store, &key.api_key).await.unwrap();
            assert_eq!(principal.user_id, user.user_id);
        }
    }

    #[actix_rt::test]
    async fn test_unknown_key_is_unauthenticated() {
        let store = MemoryStore::new();
        let result = resolve_principal(&store, "missing").await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }

    #[actix_rt::test]
    async fn test_key_of_deleted_user_is_unauthenticated() {
        let store = MemoryStore::new();
        let hasher = hasher();
        let (user, key) = AuthService::new(&store, &hasher)
            .register("alice", "a@x.com", "secret123")
            .await
            .unwrap();

        store.delete_user(user.user_id).await.unwrap();

        let result = resolve_principal(&store, &key.api_key).await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }
}
