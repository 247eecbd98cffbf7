//! Authentication and authorization

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use core_kernel::{Actor, User, UserId, UserRole};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name
    pub name: String,
    pub email: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// The principal the token was issued to
    pub fn to_actor(&self) -> Result<Actor, AuthError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)?;
        let role = if has_role(self, UserRole::Admin.as_str()) {
            UserRole::Admin
        } else {
            UserRole::User
        };
        Ok(Actor::new(UserId::from_uuid(id), self.name.clone(), role))
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `user` - The account the token identifies
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(user: &User, secret: &str, expiration_secs: u64) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: user.id.as_uuid().to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        roles: vec![user.role.as_str().to_string()],
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
///
/// # Arguments
///
/// * `token` - The JWT token to validate
/// * `secret` - JWT secret key
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role)
}

/// Accounts that may sign in through `/auth/login`
///
/// There are no passwords; knowing a listed email is enough. Identifiers
/// are fixed so issued tokens and stored ownership survive restarts.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Arc<Vec<User>>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(users),
        }
    }

    /// One admin and two regular users
    pub fn demo() -> Self {
        Self::new(vec![
            demo_user(1, "john.doe@campus.edu", "John Doe", UserRole::Admin),
            demo_user(2, "jane.smith@campus.edu", "Jane Smith", UserRole::User),
            demo_user(3, "mike.jones@campus.edu", "Mike Jones", UserRole::User),
        ])
    }

    /// Looks up a user by email, ignoring case and surrounding whitespace
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.users.iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn all(&self) -> &[User] {
        &self.users
    }
}

fn demo_user(n: u128, email: &str, name: &str, role: UserRole) -> User {
    let mut user = User::new(email, name, role);
    user.id = UserId::from_uuid(Uuid::from_u128(n));
    user
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_carries_actor() {
        let directory = UserDirectory::demo();
        let admin = directory.find_by_email("john.doe@campus.edu").unwrap();

        let token = create_token(admin, SECRET, 60).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        let actor = claims.to_actor().unwrap();

        assert_eq!(actor.user_id, admin.id);
        assert_eq!(actor.display_name, "John Doe");
        assert!(actor.is_admin());
        assert_eq!(claims.email, "john.doe@campus.edu");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let user = User::new("a@campus.edu", "A", UserRole::User);
        let token = create_token(&user, SECRET, 60).unwrap();

        assert!(matches!(
            validate_token(&token, "other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let user = User::new("a@campus.edu", "A", UserRole::User);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.as_uuid().to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            roles: vec!["user".to_string()],
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_directory_lookup_ignores_case() {
        let directory = UserDirectory::demo();
        assert!(directory.find_by_email("  JANE.SMITH@campus.edu ").is_some());
        assert!(directory.find_by_email("nobody@campus.edu").is_none());
        assert_eq!(directory.all().len(), 3);
    }

    #[test]
    fn test_malformed_subject_is_invalid() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            name: "X".to_string(),
            email: "x@campus.edu".to_string(),
            roles: vec![],
            exp: 0,
            iat: 0,
        };
        assert!(matches!(claims.to_actor(), Err(AuthError::InvalidToken)));
    }
}
