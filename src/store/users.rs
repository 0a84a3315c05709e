//! User registry and session lifecycle.
//!
//! The registry is held in memory and rewritten to the `auth-storage`
//! document on every mutation. Sessions are opaque random tokens; only the
//! SHA-256 hash of a token is kept server-side.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};

use super::persist::{Documents, AUTH_STORAGE};
use super::StoreError;

/// Tokens credited when a course is completed for the first time.
pub const COURSE_REWARD_TOKENS: u64 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Instructor,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl Role {
    /// Whether this role may create or edit catalog courses.
    pub fn can_manage_courses(&self) -> bool {
        matches!(self, Self::Instructor | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Instructor => write!(f, "instructor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub wallet_address: Option<String>,
    pub token_balance: u64,
    pub enrolled_courses: BTreeSet<String>,
    pub completed_courses: BTreeSet<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Session {
    id: String,
    user_id: String,
    token_hash: String,
    expires_at: String,
    created_at: String,
}

impl Session {
    fn is_expired(&self) -> bool {
        chrono::DateTime::parse_from_rfc3339(&self.expires_at)
            .map(|t| t <= Utc::now())
            .unwrap_or(true)
    }
}

/// Shape of the persisted `auth-storage` document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AuthDocument {
    users: Vec<User>,
    sessions: Vec<Session>,
}

pub struct UserStore {
    docs: Documents,
    users: RwLock<HashMap<String, User>>,
    /// token hash -> session
    sessions: DashMap<String, Session>,
    session_days: i64,
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| StoreError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Generate a random token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

impl UserStore {
    /// Load the registry from `auth-storage`, pruning expired sessions.
    pub fn load(docs: Documents, session_days: i64) -> Self {
        let document: AuthDocument = docs.load(AUTH_STORAGE);

        let users = document
            .users
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        let sessions = DashMap::new();
        for session in document.sessions {
            if !session.is_expired() {
                sessions.insert(session.token_hash.clone(), session);
            }
        }

        Self {
            docs,
            users: RwLock::new(users),
            sessions,
            session_days,
        }
    }

    /// Rewrite the `auth-storage` document from current state.
    fn persist(&self) -> Result<(), StoreError> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        self.docs.save(AUTH_STORAGE, &AuthDocument { users, sessions })?;
        Ok(())
    }

    fn open_session(&self, user_id: &str) -> Result<String, StoreError> {
        let token = generate_token();
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(chrono::Duration::days(self.session_days))
            .unwrap()
            .to_rfc3339();
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            token_hash: hash_token(&token),
            expires_at,
            created_at: now.to_rfc3339(),
        };
        self.sessions.insert(session.token_hash.clone(), session);
        self.persist()?;
        Ok(token)
    }

    /// Register a new account and open a session for it.
    ///
    /// Fails with `DuplicateEmail` when the address is already registered;
    /// a failed sign-up leaves the registry untouched.
    pub fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), StoreError> {
        self.sign_up_with_role(name, email, password, Role::User)
    }

    pub fn sign_up_with_role(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(User, String), StoreError> {
        let user = {
            let mut users = self.users.write();
            if users.values().any(|u| u.email.eq_ignore_ascii_case(email)) {
                return Err(StoreError::DuplicateEmail);
            }

            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(password)?,
                role,
                wallet_address: None,
                token_balance: 0,
                enrolled_courses: BTreeSet::new(),
                completed_courses: BTreeSet::new(),
                created_at: Utc::now().to_rfc3339(),
            };
            users.insert(user.id.clone(), user.clone());
            user
        };

        tracing::info!(email = %user.email, "Registered new account");
        let token = self.open_session(&user.id)?;
        Ok((user, token))
    }

    /// Open a session for an existing account.
    ///
    /// Only the email is checked: the demo registry accepts any password for
    /// a known address. An unknown email fails with `InvalidCredentials`.
    pub fn sign_in(&self, email: &str, _password: &str) -> Result<(User, String), StoreError> {
        let user = self
            .get_by_email(email)
            .ok_or(StoreError::InvalidCredentials)?;
        let token = self.open_session(&user.id)?;
        Ok((user, token))
    }

    /// Close the session for a token. Unknown tokens are not an error; the
    /// persisted registry copy remains until explicitly cleared.
    pub fn sign_out(&self, token: &str) -> Result<(), StoreError> {
        self.sessions.remove(&hash_token(token));
        self.persist()
    }

    /// Resolve a token to its user, dropping the session if it has expired.
    pub fn authenticate(&self, token: &str) -> Option<User> {
        let token_hash = hash_token(token);
        let user_id = {
            let session = self.sessions.get(&token_hash)?;
            if session.is_expired() {
                drop(session);
                self.sessions.remove(&token_hash);
                return None;
            }
            session.user_id.clone()
        };
        self.get(&user_id)
    }

    pub fn get(&self, user_id: &str) -> Option<User> {
        self.users.read().get(user_id).cloned()
    }

    pub fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Add a course to the user's enrolled set. Idempotent; returns whether
    /// the course was newly added.
    pub fn enroll_in_course(&self, user_id: &str, course_id: &str) -> Result<bool, StoreError> {
        let added = {
            let mut users = self.users.write();
            let user = users
                .get_mut(user_id)
                .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
            user.enrolled_courses.insert(course_id.to_string())
        };
        self.persist()?;
        Ok(added)
    }

    /// Mark a course completed and credit the token reward exactly once.
    /// Repeat calls for the same course are no-ops.
    pub fn complete_course(&self, user_id: &str, course_id: &str) -> Result<bool, StoreError> {
        let newly_completed = {
            let mut users = self.users.write();
            let user = users
                .get_mut(user_id)
                .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
            let newly_completed = user.completed_courses.insert(course_id.to_string());
            if newly_completed {
                user.token_balance += COURSE_REWARD_TOKENS;
            }
            newly_completed
        };
        self.persist()?;
        Ok(newly_completed)
    }

    pub fn add_tokens(&self, user_id: &str, amount: u64) -> Result<u64, StoreError> {
        let balance = {
            let mut users = self.users.write();
            let user = users
                .get_mut(user_id)
                .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
            user.token_balance += amount;
            user.token_balance
        };
        self.persist()?;
        Ok(balance)
    }

    /// Record the wallet address a user connected with.
    pub fn set_wallet_address(
        &self,
        user_id: &str,
        address: Option<String>,
    ) -> Result<(), StoreError> {
        {
            let mut users = self.users.write();
            let user = users
                .get_mut(user_id)
                .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
            user.wallet_address = address;
        }
        self.persist()
    }

    /// Ensure the configured admin account exists (created on first start).
    pub fn ensure_admin_user(&self, email: &str, password: &str) -> Result<(), StoreError> {
        if self.get_by_email(email).is_some() {
            return Ok(());
        }
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Administrator".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            role: Role::Admin,
            wallet_address: None,
            token_balance: 0,
            enrolled_courses: BTreeSet::new(),
            completed_courses: BTreeSet::new(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.users.write().insert(user.id.clone(), user);
        self.persist()?;
        tracing::info!(email, "Created admin account");
        Ok(())
    }

    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &std::path::Path) -> UserStore {
        UserStore::load(Documents::open(dir).unwrap(), 7)
    }

    #[test]
    fn test_sign_up_then_authenticate() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());

        let (user, token) = users.sign_up("Jane", "jane@test.com", "hunter2!").unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.token_balance, 0);

        let resolved = users.authenticate(&token).unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[test]
    fn test_duplicate_email_rejected_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());

        users.sign_up("Jane", "jane@test.com", "pw").unwrap();
        let err = users.sign_up("Other", "Jane@Test.com", "pw").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(users.user_count(), 1);
    }

    #[test]
    fn test_sign_in_unknown_email_fails() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());
        let err = users.sign_in("nobody@test.com", "pw").unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
    }

    // Pins a gap carried over from the demo registry: the password is not
    // verified, any value opens a session for a known email.
    #[test]
    fn test_sign_in_ignores_password() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());
        users.sign_up("Jane", "jane@test.com", "correct").unwrap();

        let (user, token) = users.sign_in("jane@test.com", "totally-wrong").unwrap();
        assert_eq!(user.email, "jane@test.com");
        assert!(users.authenticate(&token).is_some());
    }

    #[test]
    fn test_sign_out_clears_session_unconditionally() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());
        let (_, token) = users.sign_up("Jane", "jane@test.com", "pw").unwrap();

        users.sign_out(&token).unwrap();
        assert!(users.authenticate(&token).is_none());
        // Unknown token: still fine
        users.sign_out("not-a-token").unwrap();
        // Registry copy survives sign-out
        assert_eq!(users.user_count(), 1);
    }

    #[test]
    fn test_enroll_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());
        let (user, _) = users.sign_up("Jane", "jane@test.com", "pw").unwrap();

        assert!(users.enroll_in_course(&user.id, "1").unwrap());
        assert!(!users.enroll_in_course(&user.id, "1").unwrap());
        assert_eq!(users.get(&user.id).unwrap().enrolled_courses.len(), 1);
    }

    #[test]
    fn test_complete_course_rewards_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());
        let (user, _) = users.sign_up("Jane", "jane@test.com", "pw").unwrap();

        assert!(users.complete_course(&user.id, "1").unwrap());
        assert!(!users.complete_course(&user.id, "1").unwrap());
        assert_eq!(
            users.get(&user.id).unwrap().token_balance,
            COURSE_REWARD_TOKENS
        );
    }

    #[test]
    fn test_add_tokens_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());
        let (user, _) = users.sign_up("Jane", "jane@test.com", "pw").unwrap();

        assert_eq!(users.add_tokens(&user.id, 50).unwrap(), 50);
        assert_eq!(users.add_tokens(&user.id, 25).unwrap(), 75);
        assert!(matches!(
            users.add_tokens("missing", 10),
            Err(StoreError::UserNotFound(_))
        ));
    }

    // Pins a second carried-over gap: completion does not require prior
    // enrollment.
    #[test]
    fn test_completion_does_not_require_enrollment() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());
        let (user, _) = users.sign_up("Jane", "jane@test.com", "pw").unwrap();

        assert!(users.complete_course(&user.id, "never-enrolled").unwrap());
        let user = users.get(&user.id).unwrap();
        assert!(user.completed_courses.contains("never-enrolled"));
        assert!(!user.enrolled_courses.contains("never-enrolled"));
    }

    #[test]
    fn test_registry_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let token = {
            let users = store(dir.path());
            let (_, token) = users.sign_up("Jane", "jane@test.com", "pw").unwrap();
            users.complete_course(
                &users.get_by_email("jane@test.com").unwrap().id,
                "1",
            )
            .unwrap();
            token
        };

        let reloaded = store(dir.path());
        let user = reloaded.get_by_email("jane@test.com").unwrap();
        assert_eq!(user.token_balance, COURSE_REWARD_TOKENS);
        // Sessions are persisted too
        assert!(reloaded.authenticate(&token).is_some());
    }

    #[test]
    fn test_ensure_admin_user_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let users = store(dir.path());
        users.ensure_admin_user("admin@test.com", "pw").unwrap();
        users.ensure_admin_user("admin@test.com", "pw").unwrap();
        assert_eq!(users.user_count(), 1);
        assert_eq!(users.get_by_email("admin@test.com").unwrap().role, Role::Admin);
    }
}
