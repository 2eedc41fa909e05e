/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: token issue and validation
/// - [`middleware`]: request authentication (the access guard)
/// - [`authorization`]: role and ownership checks for task operations
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::jwt::{create_token, Claims};
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use taskboard_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), Role::User);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
