//! Form checks run before any call is made

use crate::core::error::{LendError, Result};

pub const MIN_PASSWORD_LEN: usize = 6;

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn invalid(message: &str) -> LendError {
    LendError::Validation(message.to_string())
}

pub fn validate_login(apartment_number: &str, password: &str) -> Result<()> {
    if blank(apartment_number) || blank(password) {
        return Err(invalid("Please fill in all fields"));
    }
    Ok(())
}

pub fn validate_registration(
    apartment_number: &str,
    name: &str,
    password: &str,
    confirm_password: &str,
) -> Result<()> {
    if blank(apartment_number) || blank(name) || blank(password) {
        return Err(invalid("Please fill in all fields"));
    }
    check_password(password, confirm_password)
}

pub fn validate_name(name: &str) -> Result<()> {
    if blank(name) {
        return Err(invalid("Name cannot be empty"));
    }
    Ok(())
}

/// Password change from the profile page
pub fn validate_new_password(password: &str, confirm_password: &str) -> Result<()> {
    if blank(password) {
        return Err(invalid("Password cannot be empty"));
    }
    check_password(password, confirm_password)
}

pub fn validate_book_fields(title: &str, author: &str) -> Result<()> {
    if blank(title) || blank(author) {
        return Err(invalid("Title and author are required"));
    }
    Ok(())
}

fn check_password(password: &str, confirm_password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("Password must be at least 6 characters"));
    }
    if password != confirm_password {
        return Err(invalid("Passwords do not match"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<()>) -> String {
        match result {
            Err(LendError::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        assert_eq!(message(validate_login("", "secret")), "Please fill in all fields");
        assert_eq!(message(validate_login("4B", "")), "Please fill in all fields");
        assert!(validate_login("4B", "secret").is_ok());
    }

    #[test]
    fn test_registration_rules() {
        assert_eq!(
            message(validate_registration("4B", " ", "secret1", "secret1")),
            "Please fill in all fields"
        );
        assert_eq!(
            message(validate_registration("4B", "Ada", "abc", "abc")),
            "Password must be at least 6 characters"
        );
        assert_eq!(
            message(validate_registration("4B", "Ada", "secret1", "secret2")),
            "Passwords do not match"
        );
        assert!(validate_registration("4B", "Ada", "secret1", "secret1").is_ok());
    }

    #[test]
    fn test_profile_rules() {
        assert_eq!(message(validate_name("   ")), "Name cannot be empty");
        assert_eq!(message(validate_new_password("", "")), "Password cannot be empty");
        assert_eq!(
            message(validate_new_password("12345", "12345")),
            "Password must be at least 6 characters"
        );
        assert!(validate_new_password("123456", "123456").is_ok());
    }

    #[test]
    fn test_book_fields() {
        assert_eq!(message(validate_book_fields("Dune", "")), "Title and author are required");
        assert!(validate_book_fields("Dune", "Frank Herbert").is_ok());
    }
}
