use garde::Validate;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::{
    error::{AppError, Result},
    services::auth::{Credentials, Registration},
};

/// The request payload for signing in.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[garde(length(min = 1, max = 255))]
    pub email: String,
    #[garde(length(min = 1, max = 128))]
    pub password: String,
}

impl LoginRequest {
    pub fn into_credentials(self) -> Result<Credentials> {
        self.validate()
            .map_err(|report| AppError::Validation(report.to_string()))?;

        Ok(Credentials {
            email: self.email,
            password: Zeroizing::new(self.password),
        })
    }
}

/// The request payload for creating an account.
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 6, max = 128))]
    pub password: String,
    #[garde(skip)]
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn into_registration(self) -> Result<Registration> {
        if self.password != self.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }

        self.validate()
            .map_err(|report| AppError::Validation(report.to_string()))?;

        Ok(Registration {
            name: self.name,
            email: self.email,
            password: Zeroizing::new(self.password),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn message(result: Result<Registration>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected a validation error"),
        }
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        assert_eq!(message(request("secret1", "secret2").into_registration()), "Passwords do not match");
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(request("abc", "abc").into_registration().is_err());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut req = request("secret1", "secret1");
        req.email = "not-an-email".to_string();
        assert!(req.into_registration().is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut req = request("secret1", "secret1");
        req.name = "  ".to_string();
        assert_eq!(message(req.into_registration()), "Name cannot be empty");
    }

    #[test]
    fn valid_registration_passes() {
        let registration = request("secret1", "secret1").into_registration().unwrap();
        assert_eq!(registration.email, "grace@example.com");
        assert_eq!(registration.password.as_str(), "secret1");
    }

    #[test]
    fn empty_login_fields_are_rejected() {
        let login = LoginRequest {
            email: String::new(),
            password: "pw".to_string(),
        };
        assert!(matches!(login.into_credentials(), Err(AppError::Validation(_))));
    }
}
