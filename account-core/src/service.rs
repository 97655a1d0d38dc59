//! User management business logic.
//!
//! [`AccountService`] wires the store, the password hasher and the token
//! signer together. One call here is one sequential chain of store/hash/
//! token operations; the service never caches records across calls and
//! relies on the store for per-operation atomicity.
//!
//! The uniqueness pre-checks in [`create_user`](AccountService::create_user)
//! and [`update_user`](AccountService::update_user) run before the write and
//! are therefore racy across concurrent callers. The store's own duplicate
//! reporting is the authoritative enforcement; the pre-checks exist to give
//! the documented error precedence (username before email).

use std::sync::Arc;

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::{AccountError, Result};
use crate::models::{NewUser, PublicUser, SecurityQuestionInfo, User, UserUpdate};
use crate::store::search::{SearchAttribute, SearchQuery};
use crate::store::{UserFilter, UserPatch, UserQuery, UserStore};
use account_crypto::{PasswordHasher, TokenSigner};

/// Normalize a security answer for storage and comparison: lowercase, trim.
fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

fn require(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AccountError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

fn trim_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenSigner,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenSigner) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// Both uniqueness checks always run; when username and email are both
    /// taken, the username violation is the one reported. The password is
    /// hashed at the moment the record is about to be persisted and at no
    /// other point.
    ///
    /// # Errors
    ///
    /// `Validation` for missing required fields, `UsernameTaken` /
    /// `EmailTaken`, `Hashing` on primitive failure, `Store` on backend
    /// failure.
    #[instrument(skip_all, fields(username = %new_user.username))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<PublicUser> {
        let username = require(&new_user.username, "username")?;
        let email = require(&new_user.email, "email")?;
        let firstname = require(&new_user.firstname, "firstname")?;
        let lastname = require(&new_user.lastname, "lastname")?;
        let field_of_activity = require(&new_user.field_of_activity, "fieldOfActivity")?;
        let security_question = require(&new_user.security_question, "securityQuestion")?;
        let security_answer = require(&new_user.security_answer, "securityAnswer")?;
        if new_user.password.is_empty() {
            return Err(AccountError::Validation("password is required".to_string()));
        }

        let taken_username = self
            .store
            .find_one(&UserQuery::by_username(username.clone()))
            .await?
            .is_some();
        let taken_email = self
            .store
            .find_one(&UserQuery::by_email(email.clone()))
            .await?
            .is_some();
        if taken_username {
            return Err(AccountError::UsernameTaken);
        }
        if taken_email {
            return Err(AccountError::EmailTaken);
        }

        let password = self.hasher.hash(&new_user.password)?;

        let user = User {
            id: Uuid::new_v4(),
            title: trim_opt(new_user.title),
            gender: trim_opt(new_user.gender),
            firstname,
            lastname,
            username,
            email,
            password,
            organisation: trim_opt(new_user.organisation),
            address: trim_opt(new_user.address),
            city: trim_opt(new_user.city),
            country: trim_opt(new_user.country),
            zip_code: new_user.zip_code,
            field_of_activity,
            research_interest: new_user.research_interest,
            role: Default::default(),
            security_question,
            security_answer: normalize_answer(&security_answer),
            eventbased_role: new_user.eventbased_role,
        };

        let stored = self.store.insert(user).await?;
        debug!(user_id = %stored.id, "user registered");
        Ok(stored.reduce())
    }

    /// Authenticate by username and password.
    ///
    /// Existence is checked first; the credential comparison is skipped
    /// entirely when the user does not exist and no timing equalization is
    /// attempted.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when no record matches the username, `BadCredentials`
    /// when the hash comparison fails.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn authenticate_user(&self, username: &str, password: &str) -> Result<PublicUser> {
        let user = self
            .store
            .find_one(&UserQuery::by_username(username))
            .await?
            .ok_or(AccountError::UserNotFound)?;

        if self.hasher.verify(password, &user.password)? {
            Ok(user.reduce())
        } else {
            warn!(user_id = %user.id, "failed login attempt");
            Err(AccountError::BadCredentials)
        }
    }

    /// Verify a bearer token, resolve its subject and return the user.
    ///
    /// # Errors
    ///
    /// `TokenVerification` for a bad or expired token, `UserNotFound` for a
    /// valid token whose subject no longer exists.
    pub async fn authenticate_user_by_token(&self, token: &str) -> Result<PublicUser> {
        let subject = self.tokens.verify(token)?;
        self.get_user(&UserQuery::by_id(subject)).await
    }

    /// Verify a bearer token without resolving the user.
    ///
    /// # Errors
    ///
    /// `TokenVerification` for a bad or expired token.
    pub fn verify_token(&self, token: &str) -> Result<Uuid> {
        Ok(self.tokens.verify(token)?)
    }

    /// Sign a fresh bearer token for `subject`.
    ///
    /// # Errors
    ///
    /// `TokenVerification` wrapping a signing failure.
    pub fn issue_token(&self, subject: Uuid) -> Result<String> {
        Ok(self.tokens.generate(subject)?)
    }

    /// Replace a user's password with the hash of `new_password`.
    ///
    /// # Errors
    ///
    /// `EmptyPassword` for a blank password, `UserNotFound` when the
    /// identifier does not resolve, `Hashing` on primitive failure.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_password(&self, id: Uuid, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }

        let encrypted = self.hasher.hash(new_password)?;
        self.store
            .update_one(id, UserPatch::Password(&encrypted))
            .await?
            .ok_or(AccountError::UserNotFound)?;
        debug!("password updated");
        Ok(())
    }

    /// Delete the user with the given username.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when no record matches.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn delete_user(&self, username: &str) -> Result<()> {
        self.store
            .delete_one(&UserQuery::by_username(username))
            .await?
            .ok_or(AccountError::UserNotFound)?;
        debug!("user deleted");
        Ok(())
    }

    /// First user matching `query`, reduced.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when nothing matches.
    pub async fn get_user(&self, query: &UserQuery) -> Result<PublicUser> {
        Ok(self.get_user_full(query).await?.reduce())
    }

    /// First user matching `query`, with sensitive fields included.
    ///
    /// For internal callers only — e.g. verifying a security answer.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when nothing matches.
    pub async fn get_user_full(&self, query: &UserQuery) -> Result<User> {
        self.store
            .find_one(query)
            .await?
            .ok_or(AccountError::UserNotFound)
    }

    /// Every user, reduced.
    ///
    /// The result set is unbounded; at the scale this service targets that
    /// is acceptable, but it does not paginate.
    pub async fn get_users(&self) -> Result<Vec<PublicUser>> {
        let users = self.store.find_many(&UserFilter::All).await?;
        Ok(users.iter().map(User::reduce).collect())
    }

    /// Every user with sensitive fields included. For internal callers
    /// only; the HTTP boundary never serves this projection.
    pub async fn get_users_full(&self) -> Result<Vec<User>> {
        Ok(self.store.find_many(&UserFilter::All).await?)
    }

    /// All users where any requested attribute matches any whitespace-
    /// separated token of `search_term`, case-insensitively.
    ///
    /// A blank term degenerates to a match-everything pattern; callers that
    /// want the empty result for blank input short-circuit before calling.
    pub async fn query_users(
        &self,
        search_term: &str,
        attributes: Option<Vec<SearchAttribute>>,
    ) -> Result<Vec<PublicUser>> {
        let search = SearchQuery::new(search_term, attributes);
        let users = self
            .store
            .find_many(&UserFilter::Matching(search))
            .await?;
        Ok(users.iter().map(User::reduce).collect())
    }

    /// Look up the user's role within one external event.
    ///
    /// Scans the stored sequence in order and returns the first entry whose
    /// event identifier matches.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when the identifier does not resolve, `EventNotFound`
    /// when no entry matches.
    pub async fn check_role(&self, id: Uuid, event: i64) -> Result<String> {
        let user = self.get_user_full(&UserQuery::by_id(id)).await?;
        user.eventbased_role
            .iter()
            .find(|entry| entry.event == event)
            .map(|entry| entry.role.clone())
            .ok_or(AccountError::EventNotFound)
    }

    /// Apply a partial profile update, re-validating uniqueness for any
    /// username/email change.
    ///
    /// # Errors
    ///
    /// `UsernameTaken` / `EmailTaken` when the new value belongs to a
    /// different record, `UserNotFound` when the identifier does not
    /// resolve.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_user(&self, id: Uuid, mut update: UserUpdate) -> Result<PublicUser> {
        update.username = update.username.as_deref().map(str::trim).map(str::to_owned);
        update.email = update.email.as_deref().map(str::trim).map(str::to_owned);
        update.security_answer = update.security_answer.as_deref().map(normalize_answer);

        if let Some(username) = &update.username {
            let other = self
                .store
                .find_one(&UserQuery::by_username(username.clone()))
                .await?;
            if other.map(|u| u.id != id).unwrap_or(false) {
                return Err(AccountError::UsernameTaken);
            }
        }
        if let Some(email) = &update.email {
            let other = self
                .store
                .find_one(&UserQuery::by_email(email.clone()))
                .await?;
            if other.map(|u| u.id != id).unwrap_or(false) {
                return Err(AccountError::EmailTaken);
            }
        }

        let updated = self
            .store
            .update_one(id, UserPatch::Profile(&update))
            .await?
            .ok_or(AccountError::UserNotFound)?;
        debug!("user updated");
        Ok(updated.reduce())
    }

    /// Identifier and security question for the account behind `email` —
    /// the first step of the password reset.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when the email does not resolve.
    pub async fn security_question(&self, email: &str) -> Result<SecurityQuestionInfo> {
        let user = self.get_user_full(&UserQuery::by_email(email)).await?;
        Ok(SecurityQuestionInfo {
            id: user.id,
            security_question: user.security_question,
        })
    }

    /// Compare a security answer against the stored one. Both sides are
    /// normalized (lowercased, trimmed) before comparison.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when the identifier does not resolve,
    /// `BadCredentials` when the answers do not match.
    pub async fn check_security_answer(&self, id: Uuid, answer: &str) -> Result<PublicUser> {
        let user = self.get_user_full(&UserQuery::by_id(id)).await?;
        if normalize_answer(answer) == normalize_answer(&user.security_answer) {
            Ok(user.reduce())
        } else {
            Err(AccountError::BadCredentials)
        }
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}
