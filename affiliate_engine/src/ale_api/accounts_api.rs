//! Registration, login and profile access for users of the affiliate programme.

use std::fmt::Debug;

use log::*;
use tokio::task;

use crate::{
    ale_api::{account_objects::NewRegistration, errors::AccountApiError},
    db_types::{NewUser, User},
    helpers::{hash_password, is_valid_email, normalize_email, verify_password},
    traits::UserManagement,
};

pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// Creates a new, active user.
    ///
    /// The email address is normalised (trimmed, lower-cased) before it is checked and stored. The referrer, if
    /// given, must already exist. Since a brand-new user cannot be anyone's referrer yet, this guarantees that the
    /// referral graph never contains a cycle.
    ///
    /// Password hashing runs on the blocking thread pool.
    pub async fn register(&self, registration: NewRegistration) -> Result<User, AccountApiError> {
        let email = normalize_email(&registration.email);
        if !is_valid_email(&email) {
            return Err(AccountApiError::Validation(format!("{} is not a valid email address", registration.email)));
        }
        if registration.password.is_empty() {
            return Err(AccountApiError::Validation("A password is required".into()));
        }
        let full_name = registration.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AccountApiError::Validation("A name is required".into()));
        }
        let password = registration.password;
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AccountApiError::PasswordHash(e.to_string()))?
            .map_err(|e| AccountApiError::PasswordHash(e.to_string()))?;
        let new_user = NewUser { email, full_name, password_hash, referrer_id: registration.referrer_id };
        let user = self.db.create_user(new_user).await?;
        info!("🔐️ New user #{} registered. Referrer: {:?}", user.id, user.referrer_id);
        Ok(user)
    }

    /// Checks the credentials, returning the user if they match.
    ///
    /// Unknown email addresses and wrong passwords are indistinguishable to the caller. The active check only happens
    /// once the password has been verified, so that the account's status is not leaked to someone without it.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AccountApiError> {
        let email = normalize_email(email);
        let user = self.db.fetch_user_by_email(&email).await?.ok_or_else(|| {
            debug!("🔐️ Login attempt for unknown email address");
            AccountApiError::InvalidCredentials
        })?;
        let (password, hash) = (password.to_string(), user.password_hash.clone());
        let matches = task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AccountApiError::PasswordHash(e.to_string()))?;
        if !matches {
            debug!("🔐️ Login attempt for user #{} with an incorrect password", user.id);
            return Err(AccountApiError::InvalidCredentials);
        }
        if !user.is_active {
            debug!("🔐️ Login attempt for inactive user #{}", user.id);
            return Err(AccountApiError::InactiveUser);
        }
        Ok(user)
    }

    pub async fn fetch_user(&self, user_id: i64) -> Result<User, AccountApiError> {
        self.db.fetch_user(user_id).await?.ok_or(AccountApiError::UserNotFound(user_id))
    }

    /// Fetches the user, and rejects them if their account has been deactivated.
    pub async fn fetch_active_user(&self, user_id: i64) -> Result<User, AccountApiError> {
        let user = self.fetch_user(user_id).await?;
        if user.is_active {
            Ok(user)
        } else {
            Err(AccountApiError::InactiveUser)
        }
    }
}

/// The link a user shares to sign up new referrals. `base_url` is the front-end address, with or without a trailing
/// slash.
pub fn referral_link(base_url: &str, user_id: i64) -> String {
    format!("{}/signup?ref={user_id}", base_url.trim_end_matches('/'))
}
