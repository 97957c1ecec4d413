//! Input validators.
//!
//! Every validator is a pure function: it either returns the normalized
//! value or an [`AgoraError::Validation`] naming the offending field. They
//! run before any cache key is derived or any store mutation happens.

use url::Url;

use crate::error::{AgoraError, Result};

/// Product and post categories accepted by the marketplace.
pub const CATEGORIES: &[&str] = &[
    "electronics",
    "furniture",
    "books",
    "clothing",
    "kitchen",
    "sports",
    "tickets",
    "other",
];

/// Item conditions accepted by the marketplace.
pub const CONDITIONS: &[&str] = &["new", "like new", "good", "fair", "poor"];

const MAX_PRICE: f64 = 100_000.0;
const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Validates a generated document id (32 hex chars, or a legacy 24-char
/// ObjectId) and returns it lowercased.
///
/// # Example
///
/// ```
/// use agora_core::validation::check_id;
///
/// assert_eq!(check_id(" 65A1B2C3D4E5F60718293A4B ").unwrap(), "65a1b2c3d4e5f60718293a4b");
/// assert!(check_id("not-an-id").is_err());
/// ```
pub fn check_id(id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AgoraError::validation("_id", "id cannot be empty"));
    }
    if !(id.len() == 32 || id.len() == 24) || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AgoraError::validation("_id", format!("'{id}' is not a valid id")));
    }
    Ok(id.to_ascii_lowercase())
}

/// Trims a string and rejects it when empty.
pub fn check_string(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AgoraError::validation(field, "cannot be empty"));
    }
    Ok(value.to_string())
}

/// Validates a product name or a post item (2 to 100 characters).
pub fn check_name(value: &str) -> Result<String> {
    let value = check_string(value, "name")?;
    let len = value.chars().count();
    if !(2..=100).contains(&len) {
        return Err(AgoraError::validation(
            "name",
            "must be between 2 and 100 characters",
        ));
    }
    Ok(value)
}

/// Validates a category against [`CATEGORIES`], case-insensitively.
pub fn check_category(value: &str) -> Result<String> {
    let value = check_string(value, "category")?.to_lowercase();
    if !CATEGORIES.contains(&value.as_str()) {
        return Err(AgoraError::validation(
            "category",
            format!("'{value}' is not a known category"),
        ));
    }
    Ok(value)
}

/// Validates an item condition against [`CONDITIONS`], case-insensitively.
pub fn check_condition(value: &str) -> Result<String> {
    let value = check_string(value, "condition")?.to_lowercase();
    if !CONDITIONS.contains(&value.as_str()) {
        return Err(AgoraError::validation(
            "condition",
            format!("'{value}' is not a known condition"),
        ));
    }
    Ok(value)
}

/// Validates a price: finite, positive, at most [`MAX_PRICE`] and with no
/// more than two decimals.
///
/// # Example
///
/// ```
/// use agora_core::validation::check_price;
///
/// assert_eq!(check_price(19.99).unwrap(), 19.99);
/// assert!(check_price(0.0).is_err());
/// assert!(check_price(1.005).is_err());
/// ```
pub fn check_price(value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AgoraError::validation("price", "must be a positive number"));
    }
    if value > MAX_PRICE {
        return Err(AgoraError::validation(
            "price",
            format!("cannot exceed {MAX_PRICE}"),
        ));
    }
    let cents = value * 100.0;
    if (cents - cents.round()).abs() > 1e-6 {
        return Err(AgoraError::validation(
            "price",
            "cannot have more than two decimals",
        ));
    }
    Ok(value)
}

/// Validates a free-text description.
pub fn check_description(value: &str) -> Result<String> {
    let value = check_string(value, "description")?;
    if value.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(AgoraError::validation(
            "description",
            format!("cannot exceed {MAX_DESCRIPTION_CHARS} characters"),
        ));
    }
    Ok(value)
}

/// Validates an email address and returns it lowercased.
pub fn check_email(value: &str) -> Result<String> {
    let value = check_string(value, "email")?.to_lowercase();
    let invalid = || AgoraError::validation("email", format!("'{value}' is not a valid email"));

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || value.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(value)
}

/// Validates a first or last name: letters, apostrophes and hyphens only.
pub fn check_person_name(value: &str, field: &str) -> Result<String> {
    let value = check_string(value, field)?;
    if value.chars().count() > 50 {
        return Err(AgoraError::validation(field, "cannot exceed 50 characters"));
    }
    if !value
        .chars()
        .all(|c| c.is_alphabetic() || c == '\'' || c == '-')
    {
        return Err(AgoraError::validation(
            field,
            "may only contain letters, apostrophes and hyphens",
        ));
    }
    Ok(value)
}

/// Uppercases the first letter of a name and lowercases the rest.
///
/// # Example
///
/// ```
/// use agora_core::validation::capitalize_name;
///
/// assert_eq!(capitalize_name("mARIA"), "Maria");
/// ```
pub fn capitalize_name(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Validates an absolute http(s) URL.
pub fn check_url(value: &str) -> Result<String> {
    let value = check_string(value, "image")?;
    let parsed = Url::parse(&value)
        .map_err(|e| AgoraError::validation("image", format!("invalid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AgoraError::validation("image", "URL must use http or https"));
    }
    Ok(value)
}

/// Validates a rating (1 to 5 inclusive).
pub fn check_rating(value: i64) -> Result<u8> {
    if !(1..=5).contains(&value) {
        return Err(AgoraError::validation("rating", "must be between 1 and 5"));
    }
    Ok(value as u8)
}
