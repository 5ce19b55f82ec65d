use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub mod handler;
pub mod service;

/// Request payload for creating an account
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccount {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

/// One row of the account listing
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub name: String,
    pub count: usize,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AccountListResponse {
    pub accounts: Vec<AccountSummary>,
}

/// Rejects empty or whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("must not be blank"));
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_names_fail_validation() {
        let payload = CreateAccount {
            name: " \t ".to_string(),
        };
        assert!(payload.validate().is_err());

        let payload = CreateAccount {
            name: "shop".to_string(),
        };
        assert!(payload.validate().is_ok());
    }
}
