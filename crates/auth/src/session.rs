//! The session context: who is signed in, persisted across restarts.

use thiserror::Error;

use crate::menu::{MenuEntry, menu_for};
use crate::routes::{Route, RouteDenied, authorize_route};
use crate::storage::{SESSION_KEY, SessionStorage, StorageError};
use crate::{Role, User, UserDirectory};

/// Sentinel password accepted for every demo account.
pub const DEMO_PASSWORD: &str = "password";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// Unknown email and wrong password are deliberately the same error.
    #[error("Email ou mot de passe incorrect")]
    InvalidCredentials,
}

/// Session context owned by the application shell.
///
/// Lifecycle: [`Session::init`] restores a persisted user at startup,
/// [`Session::login`] persists, [`Session::logout`] tears down.
pub struct Session<D, S> {
    directory: D,
    storage: S,
    password: String,
    current: Option<User>,
}

impl<D: UserDirectory, S: SessionStorage> Session<D, S> {
    /// Create a session and restore any persisted user.
    pub fn init(directory: D, storage: S) -> Self {
        Self::init_with_password(directory, storage, DEMO_PASSWORD)
    }

    /// Like [`Session::init`] with a non-default sentinel password.
    pub fn init_with_password(directory: D, storage: S, password: impl Into<String>) -> Self {
        let current = restore(&storage);
        if let Some(user) = &current {
            tracing::info!(user_id = %user.id, role = %user.role, "session restored");
        }

        Self {
            directory,
            storage,
            password: password.into(),
            current,
        }
    }

    /// Sign in against the fixed user table.
    ///
    /// Succeeds exactly when the email is known and the password matches; on
    /// failure the current user is left untouched. A storage write failure
    /// only costs persistence across restarts and is logged.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, LoginError> {
        let user = match self.directory.find_by_email(email) {
            Some(user) if password == self.password => user.clone(),
            _ => {
                tracing::warn!("login rejected: invalid credentials");
                return Err(LoginError::InvalidCredentials);
            }
        };

        if let Err(err) = persist(&self.storage, &user) {
            tracing::error!(user_id = %user.id, "failed to persist session: {err}");
        }

        tracing::info!(user_id = %user.id, role = %user.role, "user signed in");
        Ok(self.current.insert(user))
    }

    /// Sign out. Idempotent; storage failures are logged, never surfaced.
    pub fn logout(&mut self) {
        if let Some(user) = self.current.take() {
            tracing::info!(user_id = %user.id, "user signed out");
        }
        if let Err(err) = self.storage.remove(SESSION_KEY) {
            tracing::warn!("failed to clear persisted session: {err}");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.current.as_ref().map(|user| user.role)
    }

    /// Update the online flag of the signed-in user (no-op when anonymous).
    ///
    /// The record is persisted first; on a storage error the flag is unchanged.
    pub fn set_online(&mut self, is_online: bool) -> Result<(), StorageError> {
        let Some(user) = self.current.as_mut() else {
            return Ok(());
        };
        if user.is_online == is_online {
            return Ok(());
        }
        let updated = user.clone().online(is_online);
        persist(&self.storage, &updated)?;
        *user = updated;
        Ok(())
    }

    /// Run the route guard for the current viewer.
    pub fn guard(&self, path: &str) -> Result<&'static Route, RouteDenied> {
        let decision = authorize_route(self.role(), path);
        if let Err(denied) = &decision {
            tracing::debug!(path, redirect = denied.redirect_to(), "route denied");
        }
        decision
    }

    /// Sidebar entries for the current viewer (empty when anonymous).
    pub fn menu(&self) -> &'static [MenuEntry] {
        self.role().map(menu_for).unwrap_or(&[])
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }
}

fn persist(storage: &impl SessionStorage, user: &User) -> Result<(), StorageError> {
    // Serializing a `User` cannot fail: plain strings, enums and options.
    let json = serde_json::to_string(user).map_err(std::io::Error::other)?;
    storage.save(SESSION_KEY, &json)
}

fn restore(storage: &impl SessionStorage) -> Option<User> {
    let raw = match storage.load(SESSION_KEY) {
        Ok(raw) => raw?,
        Err(err) => {
            tracing::warn!("failed to read persisted session: {err}");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(err) => {
            tracing::warn!("discarding corrupt persisted session: {err}");
            if let Err(err) = storage.remove(SESSION_KEY) {
                tracing::warn!("failed to clear corrupt session: {err}");
            }
            None
        }
    }
}
