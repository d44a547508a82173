//! Request validation performed at the HTTP boundary, before any
//! service work. Rules are plain data so they stay easy to audit.

use common_http_errors::ApiError;

pub struct LengthRule {
    pub field: &'static str,
    pub min: usize,
    pub max: usize,
}

pub const NAME: LengthRule = LengthRule { field: "name", min: 3, max: 255 };
pub const PASSWORD: LengthRule = LengthRule { field: "password", min: 3, max: 10 };
pub const CATEGORY_NAME: LengthRule = LengthRule { field: "name", min: 3, max: 255 };
pub const PRODUCT_NAME: LengthRule = LengthRule { field: "name", min: 3, max: 255 };

impl LengthRule {
    pub fn check(&self, value: &str) -> Result<(), ApiError> {
        let len = value.chars().count();
        if len < self.min || len > self.max {
            return Err(ApiError::validation(
                "validation",
                format!(
                    "Field '{}' must be between {} and {} characters",
                    self.field, self.min, self.max
                ),
            ));
        }
        Ok(())
    }
}

/// Minimal shape check: one '@' with a dotted, non-empty domain.
pub fn email(value: &str) -> Result<(), ApiError> {
    let invalid = || ApiError::validation("validation", "Field 'email' must be a valid email");

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() || value.contains(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(())
}

pub fn positive_amount(value: i32) -> Result<(), ApiError> {
    if value < 1 {
        return Err(ApiError::validation(
            "validation",
            "Field 'amount' must be at least 1",
        ));
    }
    Ok(())
}

pub fn non_empty(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(
            "validation",
            format!("Field '{field}' must not be empty"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_rule_bounds() {
        assert!(NAME.check("Jo").is_err());
        assert!(NAME.check("Joana").is_ok());
        assert!(PASSWORD.check("abc").is_ok());
        assert!(PASSWORD.check("abcdefghijk").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(email("user@example.com").is_ok());
        assert!(email("user.example.com").is_err());
        assert!(email("@example.com").is_err());
        assert!(email("user@example").is_err());
        assert!(email("user name@example.com").is_err());
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(positive_amount(1).is_ok());
        assert!(positive_amount(0).is_err());
        assert!(positive_amount(-3).is_err());
    }

    #[test]
    fn non_empty_rejects_whitespace() {
        assert!(non_empty("price", "12.50").is_ok());
        assert!(non_empty("price", "   ").is_err());
    }
}
