//! Accounts: signing in, signing up, and public user profiles.
//!
//! Only the exchange with the backend lives here. Where a token ends up
//! after a successful login is up to the caller.

use crate::checkout::AuthToken;
use crate::error::CommerceError;
use crate::ids::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public profile of a marketplace user, as shown next to their listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
}

impl UserProfile {
    /// "Name <email>", or whichever half is known.
    pub fn contact_line(&self) -> String {
        match (self.name.trim(), self.email.trim()) {
            ("", "") => self.id.as_ref().map(UserId::to_string).unwrap_or_default(),
            (name, "") => name.to_string(),
            ("", email) => email.to_string(),
            (name, email) => format!("{name} <{email}>"),
        }
    }
}

/// Email and password for signing in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Reject input the backend would refuse anyway.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.email.is_empty() {
            return Err(CommerceError::AuthRejected("Email is required.".into()));
        }
        if !self.email.contains('@') {
            return Err(CommerceError::AuthRejected(format!(
                "Not an email address: {}",
                self.email
            )));
        }
        if self.password.is_empty() {
            return Err(CommerceError::AuthRejected("Password is required.".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Details for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub credentials: Credentials,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            credentials: Credentials::new(email, password),
        }
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.is_empty() {
            return Err(CommerceError::AuthRejected("Name is required.".into()));
        }
        self.credentials.validate()
    }
}

/// A signed-in user and the bearer token issued for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub user: UserProfile,
    pub token: AuthToken,
}

/// Backend that manages accounts.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<LoginSession, CommerceError>;

    /// Create an account. Returns the backend's message, if it sent one.
    async fn signup(&self, account: &NewAccount) -> Result<Option<String>, CommerceError>;

    /// Public profile of a user, such as a listing's seller.
    async fn user_profile(&self, id: &UserId) -> Result<UserProfile, CommerceError>;
}
