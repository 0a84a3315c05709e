//! Input validation for API requests.
//!
//! Validation functions return `Result<(), String>`; handlers collect the
//! messages with `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Permissive email shape check: local part, @, dotted domain
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^@\s]+@[a-zA-Z0-9][-a-zA-Z0-9]*(\.[a-zA-Z0-9][-a-zA-Z0-9]*)+$"
    ).unwrap();

    /// URL-safe course slugs (lowercase alphanumeric with dashes)
    static ref SLUG_REGEX: Regex = Regex::new(
        r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$"
    ).unwrap();

    /// 0x-prefixed 20-byte hex wallet address
    static ref ADDRESS_REGEX: Regex = Regex::new(
        r"^0x[0-9a-fA-F]{40}$"
    ).unwrap();
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if name.len() > 120 {
        return Err("Name is too long (max 120 characters)".to_string());
    }
    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate a password is present. The demo registry imposes no strength
/// rules and never verifies passwords on sign-in.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    Ok(())
}

/// Validate a course slug
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Slug is required".to_string());
    }
    if slug.len() > 100 {
        return Err("Slug is too long (max 100 characters)".to_string());
    }
    if !SLUG_REGEX.is_match(slug) {
        return Err(
            "Slug must be lowercase alphanumeric with dashes, starting and ending with alphanumeric"
                .to_string(),
        );
    }
    Ok(())
}

/// Validate a course title
pub fn validate_course_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if title.len() > 200 {
        return Err("Title is too long (max 200 characters)".to_string());
    }
    Ok(())
}

/// Validate an ETH-denominated price (zero means free)
pub fn validate_price(price_eth: f64) -> Result<(), String> {
    if !price_eth.is_finite() {
        return Err("Price must be a number".to_string());
    }
    if price_eth < 0.0 {
        return Err("Price cannot be negative".to_string());
    }
    Ok(())
}

/// Validate a review rating (1-5)
pub fn validate_review_rating(rating: u8) -> Result<(), String> {
    if !(1..=5).contains(&rating) {
        return Err("Rating must be between 1 and 5".to_string());
    }
    Ok(())
}

/// Validate a category name
pub fn validate_category(category: &str) -> Result<(), String> {
    if category.trim().is_empty() {
        return Err("Category is required".to_string());
    }
    if category.len() > 60 {
        return Err("Category is too long (max 60 characters)".to_string());
    }
    Ok(())
}

/// Validate a wallet address
pub fn validate_wallet_address(address: &str) -> Result<(), String> {
    if !ADDRESS_REGEX.is_match(address) {
        return Err("Invalid wallet address format".to_string());
    }
    Ok(())
}

/// Validate a chain id
pub fn validate_chain_id(chain_id: u64) -> Result<(), String> {
    if chain_id == 0 {
        return Err("Chain id must be non-zero".to_string());
    }
    Ok(())
}

/// Validate an investment amount in ETH
pub fn validate_amount(amount_eth: f64) -> Result<(), String> {
    if !amount_eth.is_finite() || amount_eth <= 0.0 {
        return Err("Amount must be greater than 0".to_string());
    }
    Ok(())
}

/// Validate a pool identifier
pub fn validate_pool_id(pool_id: &str) -> Result<(), String> {
    if pool_id.trim().is_empty() {
        return Err("Pool id is required".to_string());
    }
    if pool_id.len() > 60 {
        return Err("Pool id is too long (max 60 characters)".to_string());
    }
    Ok(())
}

/// Validate a quiz score (percent)
pub fn validate_score(score: u32) -> Result<(), String> {
    if score > 100 {
        return Err("Score must be between 0 and 100".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@test.com").is_ok());
        assert!(validate_email("jane.doe+tag@sub.example.io").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("jane@nodot").is_err());
        assert!(validate_email("jane @test.com").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("blockchain-fundamentals").is_ok());
        assert!(validate_slug("defi101").is_ok());

        assert!(validate_slug("").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
        assert!(validate_slug("Upper-Case").is_err());
        assert!(validate_slug("no spaces").is_err());
    }

    #[test]
    fn test_validate_wallet_address() {
        assert!(validate_wallet_address("0x1234567890abcdef1234567890abcdef12345678").is_ok());
        assert!(validate_wallet_address("0x1234").is_err());
        assert!(validate_wallet_address("1234567890abcdef1234567890abcdef12345678").is_err());
        assert!(validate_wallet_address("0xZZ34567890abcdef1234567890abcdef12345678").is_err());
    }

    #[test]
    fn test_validate_price_and_amount() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(0.15).is_ok());
        assert!(validate_price(-0.1).is_err());
        assert!(validate_price(f64::NAN).is_err());

        assert!(validate_amount(0.5).is_ok());
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_review_rating() {
        for r in 1..=5u8 {
            assert!(validate_review_rating(r).is_ok());
        }
        assert!(validate_review_rating(0).is_err());
        assert!(validate_review_rating(6).is_err());
    }

    #[test]
    fn test_validate_chain_id_and_score() {
        assert!(validate_chain_id(1).is_ok());
        assert!(validate_chain_id(0).is_err());

        assert!(validate_score(0).is_ok());
        assert!(validate_score(100).is_ok());
        assert!(validate_score(101).is_err());
    }
}
