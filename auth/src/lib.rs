//! Authentication primitives for the user service
//!
//! - Password hashing (Argon2id with a fixed work factor)
//! - Access token issuing and parsing (HMAC-signed JWT)
//! - An [`Authenticator`] tying both to one configured secret
//!
//! Nothing here knows about users, storage or HTTP; the service adapts these
//! building blocks to its own domain.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("longenough1").unwrap();
//! assert!(hasher.verify("longenough1", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler.issue("a@b.com", Duration::hours(1)).unwrap();
//! let claims = handler.parse(&token).unwrap();
//! assert_eq!(claims.email, "a@b.com");
//! ```
//!
//! ## Login Flow
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Signup: hash password
//! let hash = auth.hash_password("longenough1").unwrap();
//!
//! // Login: verify and issue
//! assert!(auth.verify_password("longenough1", &hash).unwrap());
//! let token = auth.issue_token("a@b.com", Duration::hours(1)).unwrap();
//!
//! // Protected request: parse and check expiry
//! let claims = auth.validate_token(&token).unwrap();
//! assert_eq!(claims.email, "a@b.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
