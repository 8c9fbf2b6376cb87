use async_trait::async_trait;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::ProfileView;
use crate::domain::user::models::SignInForm;
use crate::domain::user::models::SignUpForm;
use crate::domain::user::models::UpdateProfileForm;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `form` - Raw signup input
    ///
    /// # Returns
    /// ID of the created user
    ///
    /// # Errors
    /// * `InvalidInput` - One or more fields failed validation
    /// * `DuplicateEmail` - Email is already registered
    /// * `Password` / `DatabaseError` - Infrastructure failure
    async fn sign_up(&self, form: SignUpForm) -> Result<UserId, UserError>;

    /// Check credentials and issue an access token.
    ///
    /// # Arguments
    /// * `form` - Email and plaintext password
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `InvalidInput` - Form failed validation
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Password` / `DatabaseError` / `Unknown` - Infrastructure failure
    async fn sign_in(&self, form: SignInForm) -> Result<String, UserError>;

    /// Read a user's public profile.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_profile(&self, id: &UserId) -> Result<ProfileView, UserError>;

    /// Apply a partial update to a profile.
    ///
    /// # Arguments
    /// * `id` - User ID to update
    /// * `form` - Fields to change; absent fields are kept
    ///
    /// # Returns
    /// Profile after the update
    ///
    /// # Errors
    /// * `InvalidInput` - A provided field failed validation
    /// * `NotFound` - User does not exist
    /// * `DuplicateEmail` - New email belongs to another account
    /// * `EditConflict` - Row changed between read and write
    /// * `Password` / `DatabaseError` - Infrastructure failure
    async fn update_profile(
        &self,
        id: &UserId,
        form: UpdateProfileForm,
    ) -> Result<ProfileView, UserError>;

    /// Resolve a bearer token into its claims.
    ///
    /// # Returns
    /// Claims of a well-signed, unexpired token whose user still exists
    ///
    /// # Errors
    /// * `InvalidToken` - Bad token, expired token or unknown user
    /// * `DatabaseError` - User lookup failed
    async fn authorize(&self, token: &str) -> Result<auth::Claims, UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert a new user.
    ///
    /// # Returns
    /// Stored user with its generated id, timestamp and version
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Check whether an account with this email exists.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn exists_by_email(&self, email: &str) -> Result<bool, UserError>;

    /// Persist changed fields if the stored version still equals
    /// `user.version`.
    ///
    /// # Returns
    /// Updated user carrying the new version
    ///
    /// # Errors
    /// * `EditConflict` - Row is gone or its version moved on
    /// * `DuplicateEmail` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: &User) -> Result<User, UserError>;
}
