// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy for admin accounts.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not mix enough character classes.
    #[error(
        "Password must contain at least {required} of: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password contains the username.
    #[error("Password must not contain the username")]
    ContainsUsername,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            min_complexity: 3,
        }
    }
}

/// The four character classes a password can draw from.
#[derive(Default)]
struct CharClasses {
    upper: bool,
    lower: bool,
    digit: bool,
    symbol: bool,
}

impl CharClasses {
    fn of(password: &str) -> Self {
        password.chars().fold(Self::default(), |mut classes, c| {
            if c.is_uppercase() {
                classes.upper = true;
            } else if c.is_lowercase() {
                classes.lower = true;
            } else if c.is_ascii_digit() {
                classes.digit = true;
            } else if !c.is_whitespace() {
                classes.symbol = true;
            }
            classes
        })
    }

    fn count(&self) -> usize {
        [self.upper, self.lower, self.digit, self.symbol]
            .into_iter()
            .filter(|present| *present)
            .count()
    }
}

impl PasswordPolicy {
    /// Validates an admin password.
    ///
    /// # Arguments
    ///
    /// * `password` - The candidate password
    /// * `username` - The admin's username, which the password must not contain
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` naming the first rule the password breaks.
    pub fn validate(&self, password: &str, username: &str) -> Result<(), PasswordPolicyError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = CharClasses::of(password).count();
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        let username: String = username.trim().to_lowercase();
        if !username.is_empty() && password.to_lowercase().contains(&username) {
            return Err(PasswordPolicyError::ContainsUsername);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_passwords() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert!(policy.validate("Ballot-Box-2026", "organizer").is_ok());
        assert!(policy.validate("quorum#count7", "organizer").is_ok());
        assert!(policy.validate("TALLY!sheet9", "organizer").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert_eq!(
            policy.validate("Ab1!", "organizer"),
            Err(PasswordPolicyError::TooShort { min_length: 10 })
        );
    }

    #[test]
    fn test_insufficient_complexity() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert_eq!(
            policy.validate("onlylowercaseletters", "organizer"),
            Err(PasswordPolicyError::InsufficientComplexity {
                required: 3,
                found: 1
            })
        );
        assert_eq!(
            policy.validate("MixedCaseLetters", "organizer"),
            Err(PasswordPolicyError::InsufficientComplexity {
                required: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_password_containing_username_is_rejected() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert_eq!(
            policy.validate("Organizer-2026", "organizer"),
            Err(PasswordPolicyError::ContainsUsername)
        );
    }

    #[test]
    fn test_character_class_count() {
        assert_eq!(CharClasses::of("Aa1!").count(), 4);
        assert_eq!(CharClasses::of("Aa1").count(), 3);
        assert_eq!(CharClasses::of("abc!").count(), 2);
        assert_eq!(CharClasses::of("   ").count(), 0);
        assert_eq!(CharClasses::of("").count(), 0);
    }
}
