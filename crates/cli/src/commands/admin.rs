//! Admin user management commands.

use rand::Rng;
use secrecy::SecretString;
use thiserror::Error;

use ondine_admin::db::AdminUserRepository;
use ondine_admin::services::auth::hash_password;
use ondine_core::{AdminRole, Email};

/// Length of generated admin passwords.
const PASSWORD_LENGTH: usize = 24;

/// Errors that can occur while managing admin users.
#[derive(Debug, Error)]
pub enum AdminCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] ondine_core::EmailError),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] ondine_admin::db::RepositoryError),
}

/// Create a new admin user with a generated password.
///
/// The password is printed once; the admin should change it after first
/// login.
///
/// # Errors
///
/// Returns `AdminCommandError` if inputs are invalid or the database
/// rejects the insert (e.g. duplicate email).
pub async fn create_user(email: &str, name: &str, role: &str) -> Result<(), AdminCommandError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    let role: AdminRole = role
        .parse()
        .map_err(AdminCommandError::InvalidRole)?;

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .map_err(|_| AdminCommandError::MissingEnvVar("ADMIN_DATABASE_URL"))?;
    let pool = ondine_admin::db::create_pool(&SecretString::from(database_url)).await?;

    let password = generate_password();
    let password_hash = hash_password(&password).map_err(AdminCommandError::PasswordHash)?;

    let admin = AdminUserRepository::new(&pool)
        .create(&email, name, role, &password_hash)
        .await?;

    tracing::info!(admin = %admin.id, role = %admin.role, "admin user created");

    #[allow(clippy::print_stdout)]
    {
        println!("Created {role} {email}");
        println!("Temporary password: {password}");
        println!("Store it now; it is not shown again.");
    }

    Ok(())
}

/// Generate a random password from a mixed alphabet.
fn generate_password() -> String {
    const ALPHABET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

    let mut rng = rand::rng();
    (0..PASSWORD_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            char::from(ALPHABET[idx])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_are_long_enough() {
        let password = generate_password();
        assert_eq!(password.len(), PASSWORD_LENGTH);
    }
}
