use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Duration;

use crate::domain::user::credentials::CredentialStore;
use crate::domain::user::models::ProfileView;
use crate::domain::user::models::SignInForm;
use crate::domain::user::models::SignUpForm;
use crate::domain::user::models::UpdateProfileForm;
use crate::domain::user::models::UserId;
use crate::domain::user::validation::validate_sign_in;
use crate::domain::user::validation::validate_sign_up;
use crate::domain::user::validation::validate_update;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of UserServicePort with dependency injection; the
/// signing secret lives in the injected [`Authenticator`] and the token
/// lifetime is fixed at construction.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    credentials: CredentialStore<UR>,
    authenticator: Arc<Authenticator>,
    token_ttl: Duration,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token signing
    /// * `token_ttl` - Lifetime of issued access tokens
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>, token_ttl: Duration) -> Self {
        Self {
            credentials: CredentialStore::new(repository, Arc::clone(&authenticator)),
            authenticator,
            token_ttl,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn sign_up(&self, form: SignUpForm) -> Result<UserId, UserError> {
        validate_sign_up(&form).into_result()?;

        let id = self.credentials.create(form.into()).await?;
        tracing::info!(user_id = %id, "New user signed up");

        Ok(id)
    }

    async fn sign_in(&self, form: SignInForm) -> Result<String, UserError> {
        validate_sign_in(&form).into_result()?;

        let user = self
            .credentials
            .authenticate(&form.email, &form.password)
            .await?;

        let token = self.authenticator.issue_token(&user.email, self.token_ttl)?;
        tracing::info!(user_id = %user.id, email = %user.email, "User logged in");

        Ok(token)
    }

    async fn get_profile(&self, id: &UserId) -> Result<ProfileView, UserError> {
        self.credentials
            .get_by_id(id)
            .await
            .map(|user| ProfileView::from(&user))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        form: UpdateProfileForm,
    ) -> Result<ProfileView, UserError> {
        validate_update(&form).into_result()?;

        let mut user = self.credentials.get_by_id(id).await?;
        let changed_fields = form.changed_fields();

        if let Some(first_name) = form.first_name {
            user.first_name = first_name;
        }

        if let Some(last_name) = form.last_name {
            user.last_name = last_name;
        }

        if let Some(email) = form.email {
            user.email = email;
        }

        let updated_user = self
            .credentials
            .update(user, form.password.as_deref())
            .await?;

        tracing::info!(
            user_id = %updated_user.id,
            version = updated_user.version,
            changed = ?changed_fields,
            "User profile updated"
        );

        Ok((&updated_user).into())
    }

    async fn authorize(&self, token: &str) -> Result<auth::Claims, UserError> {
        let claims = self.authenticator.validate_token(token)?;

        if !self.credentials.exists(&claims.email).await? {
            return Err(UserError::InvalidToken(
                "token subject no longer exists".to_string(),
            ));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::NewUser;
    use crate::domain::user::models::User;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn exists_by_email(&self, email: &str) -> Result<bool, UserError>;
            async fn update(&self, user: &User) -> Result<User, UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET))
    }

    fn service(repository: MockTestUserRepository) -> UserService<MockTestUserRepository> {
        UserService::new(Arc::new(repository), authenticator(), Duration::hours(24))
    }

    fn stored_user(id: i64, password: &str) -> User {
        User {
            id: UserId(id),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@b.com".to_string(),
            password_hash: authenticator().hash_password(password).unwrap(),
            created_at: Utc::now(),
            version: 1,
        }
    }

    fn sign_up_form() -> SignUpForm {
        SignUpForm {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@b.com".to_string(),
            password: "longenough1".to_string(),
        }
    }

    fn into_stored(user: NewUser, id: i64) -> User {
        User {
            id: UserId(id),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
            version: 1,
        }
    }

    #[tokio::test]
    async fn test_sign_up_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.first_name == "A"
                    && user.email == "a@b.com"
                    && user.password_hash.starts_with("$argon2id")
            })
            .times(1)
            .returning(|user| Ok(into_stored(user, 1)));

        let result = service(repository).sign_up(sign_up_form()).await;

        assert_eq!(result.unwrap(), UserId(1));
    }

    #[tokio::test]
    async fn test_sign_up_blank_field_is_invalid_input() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_create().times(0);

        let form = SignUpForm {
            last_name: "  ".to_string(),
            ..sign_up_form()
        };

        match service(repository).sign_up(form).await {
            Err(UserError::InvalidInput(errors)) => {
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["lastName"]);
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|user| Err(UserError::DuplicateEmail(user.email)));

        let result = service(repository).sign_up(sign_up_form()).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_sign_in_issues_token_for_account() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user(1, "longenough1");

        repository
            .expect_find_by_email()
            .withf(|email| email == "a@b.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let token = service(repository)
            .sign_in(SignInForm {
                email: "a@b.com".to_string(),
                password: "longenough1".to_string(),
            })
            .await
            .expect("sign in failed");

        let claims = authenticator().validate_token(&token).unwrap();
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user(1, "longenough1");

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(repository)
            .sign_in(SignInForm {
                email: "a@b.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email_looks_like_wrong_password() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repository)
            .sign_in(SignInForm {
                email: "nobody@b.com".to_string(),
                password: "longenough1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_in_invalid_input_skips_lookup() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().times(0);

        let result = service(repository)
            .sign_in(SignInForm {
                email: "not-an-email".to_string(),
                password: String::new(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_get_profile() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user(7, "longenough1");

        repository
            .expect_find_by_id()
            .withf(|id| *id == UserId(7))
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let profile = service(repository).get_profile(&UserId(7)).await.unwrap();

        assert_eq!(
            profile,
            ProfileView {
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                email: "a@b.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repository).get_profile(&UserId(99)).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_profile_applies_only_provided_fields() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user(1, "longenough1");
        let old_hash = user.password_hash.clone();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        repository
            .expect_update()
            .withf(move |user| {
                user.first_name == "Ann"
                    && user.last_name == "B"
                    && user.email == "a@b.com"
                    && user.password_hash == old_hash
                    && user.version == 1
            })
            .times(1)
            .returning(|user| {
                Ok(User {
                    version: user.version + 1,
                    ..user.clone()
                })
            });

        let profile = service(repository)
            .update_profile(
                &UserId(1),
                UpdateProfileForm {
                    first_name: Some("Ann".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.first_name, "Ann");
        assert_eq!(profile.last_name, "B");
    }

    #[tokio::test]
    async fn test_update_profile_rehashes_new_password() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user(1, "longenough1");

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        repository
            .expect_update()
            .withf(|user| {
                authenticator()
                    .verify_password("brandnewpass", &user.password_hash)
                    .unwrap_or(false)
            })
            .times(1)
            .returning(|user| Ok(user.clone()));

        let result = service(repository)
            .update_profile(
                &UserId(1),
                UpdateProfileForm {
                    password: Some("brandnewpass".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile_edit_conflict() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user(1, "longenough1");

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        // another writer bumped the version between our read and write
        repository
            .expect_update()
            .times(1)
            .returning(|_| Err(UserError::EditConflict));

        let result = service(repository)
            .update_profile(
                &UserId(1),
                UpdateProfileForm {
                    last_name: Some("C".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::EditConflict)));
    }

    #[tokio::test]
    async fn test_update_profile_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);

        let result = service(repository)
            .update_profile(&UserId(1), UpdateProfileForm::default())
            .await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_invalid_email() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(0);

        let result = service(repository)
            .update_profile(
                &UserId(1),
                UpdateProfileForm {
                    email: Some("nope".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_authorize_valid_token() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_email()
            .withf(|email| email == "a@b.com")
            .times(1)
            .returning(|_| Ok(true));

        let token = authenticator()
            .issue_token("a@b.com", Duration::hours(1))
            .unwrap();

        let claims = service(repository).authorize(&token).await.unwrap();
        assert_eq!(claims.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_authorize_expired_token() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_exists_by_email().times(0);

        let token = authenticator()
            .issue_token("a@b.com", Duration::zero())
            .unwrap();

        let result = service(repository).authorize(&token).await;
        assert!(matches!(result, Err(UserError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_authorize_wrong_secret() {
        let repository = MockTestUserRepository::new();

        let token = Authenticator::new(b"some-other-secret-that-is-32-bytes-long")
            .issue_token("a@b.com", Duration::hours(1))
            .unwrap();

        let result = service(repository).authorize(&token).await;
        assert!(matches!(result, Err(UserError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_authorize_deleted_user_is_unauthorized() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));

        let token = authenticator()
            .issue_token("gone@b.com", Duration::hours(1))
            .unwrap();

        let result = service(repository).authorize(&token).await;
        assert!(matches!(result, Err(UserError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_authorize_lookup_failure_is_internal() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let token = authenticator()
            .issue_token("a@b.com", Duration::hours(1))
            .unwrap();

        let result = service(repository).authorize(&token).await;
        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }
}
