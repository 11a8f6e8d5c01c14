//! Authentication gate for casefile.
//!
//! A small two-state machine (anonymous or authenticated) over a static
//! account table. Account secrets are salted PBKDF2-SHA256 hashes; the two
//! login failure reasons stay distinct because they are the only
//! user-facing validation messages in the system.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Length of the per-account salt in bytes.
const SALT_LEN: usize = 16;

/// Length of the derived hash in bytes.
const HASH_LEN: usize = 32;

/// PBKDF2 iteration count for new hashes.
const ITERATIONS: u32 = 100_000;

/// Prefix identifying the hash scheme in encoded form.
const SCHEME: &str = "pbkdf2-sha256";

/// Why a login attempt was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    /// No account with that username exists.
    #[error("user not found: check your username")]
    UnknownUser,
    /// The account exists but the password did not match.
    #[error("incorrect password")]
    WrongPassword,
}

/// Hash a password into the encoded form stored in account tables.
///
/// Format: `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password, &salt, ITERATIONS);
    format!(
        "{SCHEME}${ITERATIONS}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Verify a password against an encoded hash.
///
/// Returns `false` for a mismatch or an unparseable hash; a corrupt account
/// entry must never authenticate.
#[must_use]
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let Some((iterations, salt, expected)) = parse_encoded(encoded) else {
        warn!("account has an unparseable password hash");
        return false;
    };
    let derived = derive(password, &salt, iterations);
    // Fixed-time comparison.
    let mut diff = 0u8;
    for (a, b) in derived.iter().zip(expected.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}

/// Check that an encoded hash is structurally valid.
#[must_use]
pub fn is_valid_hash(encoded: &str) -> bool {
    parse_encoded(encoded).is_some()
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    let _ = pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, iterations, &mut out);
    out
}

fn parse_encoded(encoded: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = encoded.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations: u32 = parts.next()?.parse().ok()?;
    let salt = hex::decode(parts.next()?).ok()?;
    let hash = hex::decode(parts.next()?).ok()?;
    if parts.next().is_some() || iterations == 0 || salt.is_empty() || hash.len() != HASH_LEN {
        return None;
    }
    Some((iterations, salt, hash))
}

/// An account in the static credential table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Login name.
    pub username: String,
    /// Name shown in the UI once logged in.
    pub display_name: String,
    /// Whether this account may create and delete evidence.
    pub can_edit: bool,
    /// Encoded PBKDF2-SHA256 password hash.
    pub password_hash: String,
}

impl Account {
    /// Create an account, hashing the given plaintext password.
    #[must_use]
    pub fn with_password(
        username: impl Into<String>,
        display_name: impl Into<String>,
        can_edit: bool,
        password: &str,
    ) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
            can_edit,
            password_hash: hash_password(password),
        }
    }

    /// Verify a password attempt against this account.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }
}

/// The static credential table gating mutation entry points.
#[derive(Debug, Clone, Default)]
pub struct AccountTable {
    accounts: Vec<Account>,
}

impl AccountTable {
    /// Build a table from explicit accounts.
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    /// The built-in table used when no accounts are configured.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            Account::with_password("editor", "Editor", true, "editor123"),
            Account::with_password("viewer", "Viewer", false, "viewer123"),
        ])
    }

    /// Look up an account by username. Exact match only.
    #[must_use]
    pub fn find(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    /// Number of accounts in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check whether the table has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// The authenticated identity held by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Login name.
    pub username: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Whether mutations are permitted.
    pub can_edit: bool,
}

/// Current authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Nobody is logged in.
    #[default]
    Anonymous,
    /// A user is logged in.
    Authenticated(SessionUser),
}

/// The auth gate: account table plus current session state.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    accounts: AccountTable,
    state: AuthState,
}

impl AuthGate {
    /// Create a gate over the given account table.
    #[must_use]
    pub fn new(accounts: AccountTable) -> Self {
        Self {
            accounts,
            state: AuthState::Anonymous,
        }
    }

    /// Attempt to log in.
    ///
    /// On success the gate transitions to authenticated and the session
    /// user is returned. Any failure leaves the gate anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::UnknownUser`] when the username is absent from
    /// the table and [`LoginError::WrongPassword`] when it is present but
    /// the password does not match.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> std::result::Result<SessionUser, LoginError> {
        let account = self.accounts.find(username).ok_or_else(|| {
            debug!("login rejected: unknown user {:?}", username);
            LoginError::UnknownUser
        })?;

        if !account.verify(password) {
            debug!("login rejected: wrong password for {:?}", username);
            return Err(LoginError::WrongPassword);
        }

        let user = SessionUser {
            username: account.username.clone(),
            display_name: account.display_name.clone(),
            can_edit: account.can_edit,
        };
        info!("user {} logged in", user.username);
        self.state = AuthState::Authenticated(user.clone());
        Ok(user)
    }

    /// Log out, returning to the anonymous state.
    pub fn logout(&mut self) {
        if let AuthState::Authenticated(user) = &self.state {
            info!("user {} logged out", user.username);
        }
        self.state = AuthState::Anonymous;
    }

    /// Restore a previously saved session.
    ///
    /// The username must still exist in the account table; stale sessions
    /// for removed accounts are dropped. The edit flag is re-read from the
    /// table rather than trusted from the snapshot.
    pub fn restore(&mut self, session: SessionUser) {
        match self.accounts.find(&session.username) {
            Some(account) => {
                self.state = AuthState::Authenticated(SessionUser {
                    username: account.username.clone(),
                    display_name: account.display_name.clone(),
                    can_edit: account.can_edit,
                });
            }
            None => {
                warn!(
                    "dropping saved session for unknown user {:?}",
                    session.username
                );
            }
        }
    }

    /// The current session user, if authenticated.
    #[must_use]
    pub fn current_user(&self) -> Option<&SessionUser> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Anonymous => None,
        }
    }

    /// Whether the current session may mutate evidence.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        matches!(&self.state, AuthState::Authenticated(user) if user.can_edit)
    }

    /// Guard check for mutating handlers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] unless the session is authenticated
    /// with the edit flag set.
    pub fn require_edit(&self) -> Result<()> {
        if self.can_edit() {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }
}
