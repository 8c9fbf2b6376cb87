use std::sync::Arc;

use auth::Authenticator;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserDraft;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Account storage that owns password handling.
///
/// Plaintext passwords enter here and only hashes go further down to the
/// repository.
pub struct CredentialStore<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> CredentialStore<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Hash the draft's password and insert the account.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    pub async fn create(&self, draft: UserDraft) -> Result<UserId, UserError> {
        let password_hash = self.authenticator.hash_password(&draft.password)?;

        let user = self
            .repository
            .create(NewUser {
                first_name: draft.first_name,
                last_name: draft.last_name,
                email: draft.email,
                password_hash,
            })
            .await?;

        Ok(user.id)
    }

    /// Look up by email and compare the password.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No match
    /// * `Password` - Stored hash is unreadable
    /// * `DatabaseError` - Database operation failed
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            return Err(UserError::InvalidCredentials);
        };

        if !self
            .authenticator
            .verify_password(password, &user.password_hash)?
        {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn exists(&self, email: &str) -> Result<bool, UserError> {
        self.repository.exists_by_email(email).await
    }

    /// # Errors
    /// * `NotFound` - No user with this id
    /// * `DatabaseError` - Database operation failed
    pub async fn get_by_id(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    /// Write back a user read earlier, optionally with a new password.
    ///
    /// # Errors
    /// * `EditConflict` - Row changed since `user` was read
    /// * `DuplicateEmail` - New email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    pub async fn update(
        &self,
        mut user: User,
        new_password: Option<&str>,
    ) -> Result<User, UserError> {
        if let Some(password) = new_password {
            user.password_hash = self.authenticator.hash_password(password)?;
        }

        self.repository.update(&user).await
    }
}
