//! Credential checks and account store error messages.

use thiserror::Error;

use super::password::PasswordError;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Shown when an account store failure has no dedicated message.
pub const GENERIC_AUTH_MESSAGE: &str =
    "Une erreur est survenue. Veuillez réessayer ou contacter le support.";

/// Authentication failures.
///
/// Variants raised by the account store carry the store's English message;
/// [`AuthError::user_message`] turns them into French text.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password field is blank.
    #[error("Veuillez remplir tous les champs.")]
    MissingFields,

    /// Email lacks an `@`.
    #[error("Veuillez entrer une adresse email valide.")]
    MalformedEmail,

    /// Password shorter than [`MIN_PASSWORD_LEN`].
    #[error("Le mot de passe doit contenir au moins 6 caractères.")]
    PasswordTooShort,

    /// New password left empty.
    #[error("Le nouveau mot de passe est obligatoire")]
    NewPasswordRequired,

    /// Confirmation differs from the new password.
    #[error("Les mots de passe ne correspondent pas")]
    PasswordMismatch,

    /// Unknown email or wrong password.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Email already has an account.
    #[error("User already registered")]
    AlreadyRegistered,

    /// Password rejected by the store.
    #[error("Password should be at least 6 characters")]
    WeakPassword,

    /// Email rejected by the store.
    #[error("Unable to validate email address: invalid format")]
    InvalidEmail,

    /// Refresh token unknown, expired or revoked.
    #[error("Session expired or revoked")]
    SessionRevoked,

    /// Hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Persistence failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFields
            | Self::MalformedEmail
            | Self::PasswordTooShort
            | Self::NewPasswordRequired
            | Self::PasswordMismatch => self.to_string(),
            Self::SessionRevoked => {
                "Votre session a expiré. Veuillez vous reconnecter.".to_string()
            }
            other => localize_auth_error(&other.to_string()).to_string(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingFields
            | Self::MalformedEmail
            | Self::PasswordTooShort
            | Self::NewPasswordRequired
            | Self::PasswordMismatch
            | Self::WeakPassword
            | Self::InvalidEmail => "VALIDATION_ERROR",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::SessionRevoked => "SESSION_REVOKED",
            Self::Password(_) | Self::Repository(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::MissingFields
            | Self::MalformedEmail
            | Self::PasswordTooShort
            | Self::NewPasswordRequired
            | Self::PasswordMismatch
            | Self::WeakPassword
            | Self::InvalidEmail => 400,
            Self::InvalidCredentials | Self::SessionRevoked => 401,
            Self::AlreadyRegistered => 409,
            Self::Password(_) | Self::Repository(_) => 500,
        }
    }
}

/// Checks sign-in and sign-up input before it reaches the account store.
///
/// # Errors
///
/// Returns the first failing rule: blank field, missing `@`, short password.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingFields);
    }
    if !email.contains('@') {
        return Err(AuthError::MalformedEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

/// Checks a password change.
///
/// # Errors
///
/// Returns the first failing rule: empty, mismatched, short.
pub fn validate_password_change(new_password: &str, confirmation: &str) -> Result<(), AuthError> {
    if new_password.is_empty() {
        return Err(AuthError::NewPasswordRequired);
    }
    if new_password != confirmation {
        return Err(AuthError::PasswordMismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

/// French message for an account store failure, matched on known substrings.
#[must_use]
pub fn localize_auth_error(message: &str) -> &'static str {
    const MESSAGES: [(&str, &str); 6] = [
        (
            "Invalid login credentials",
            "Email ou mot de passe incorrect. Vérifiez vos identifiants et réessayez.",
        ),
        (
            "Email not confirmed",
            "Votre email n'est pas encore confirmé. Vérifiez votre boîte mail et cliquez sur le lien de confirmation.",
        ),
        (
            "User already registered",
            "Un compte existe déjà avec cette adresse email. Essayez de vous connecter.",
        ),
        (
            "Password should be at least",
            "Le mot de passe doit contenir au moins 6 caractères.",
        ),
        (
            "Unable to validate email address",
            "Adresse email invalide. Vérifiez le format de votre email.",
        ),
        (
            "signup is disabled",
            "Les inscriptions sont temporairement désactivées. Contactez l'administrateur.",
        ),
    ];

    MESSAGES
        .iter()
        .find(|(needle, _)| message.contains(*needle))
        .map_or(GENERIC_AUTH_MESSAGE, |&(_, localized)| localized)
}
