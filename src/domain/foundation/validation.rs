//! Small field validators shared by the domain constructors.

use super::ValidationError;

/// Trims `value` and checks its character length is within `[min, max]`.
pub fn text(field: &str, value: &str, min: usize, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 && min > 0 {
        return Err(ValidationError::empty_field(field));
    }
    if len < min || len > max {
        return Err(ValidationError::out_of_range(
            field,
            min as i64,
            max as i64,
            len as i64,
        ));
    }
    Ok(trimmed.to_string())
}

/// Like [`text`] but empty input becomes `None`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => text(field, v, 1, max).map(Some),
    }
}

/// Lower-cases and checks a plausible email address.
pub fn email(value: &str) -> Result<String, ValidationError> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    let valid = normalized.len() <= 254
        && !normalized.contains(char::is_whitespace)
        && match normalized.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !domain.contains('@')
            }
            None => false,
        };
    if valid {
        Ok(normalized)
    } else {
        Err(ValidationError::invalid_format("email", "not a valid email address"))
    }
}

/// Phone numbers are 10 to 15 digits with an optional leading `+`.
pub fn phone(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.len() < 10 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(
            "phone",
            "expected 10-15 digits with optional leading +",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn optional_phone(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => phone(v).map(Some),
    }
}

/// Inclusive integer range check.
pub fn range(field: &str, value: i64, min: i64, max: i64) -> Result<i64, ValidationError> {
    if value < min || value > max {
        Err(ValidationError::out_of_range(field, min, max, value))
    } else {
        Ok(value)
    }
}

/// Largest rupee amount any price, rate or fee may carry. Totals derived
/// from bounded amounts stay well inside `i64`, even after conversion to paise.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Strictly positive amount, at most [`MAX_AMOUNT`].
pub fn positive(field: &str, value: i64) -> Result<i64, ValidationError> {
    range(field, value, 1, MAX_AMOUNT)
}

/// Zero or positive amount, at most [`MAX_AMOUNT`].
pub fn amount(field: &str, value: i64) -> Result<i64, ValidationError> {
    range(field, value, 0, MAX_AMOUNT)
}

/// Rupees to paise for the payment gateway.
pub fn paise(field: &str, rupees: i64) -> Result<i64, ValidationError> {
    rupees
        .checked_mul(100)
        .filter(|p| *p >= 0)
        .ok_or_else(|| ValidationError::out_of_range(field, 0, MAX_AMOUNT, rupees))
}

/// Trims entries, drops blanks and duplicates, and caps the list length.
pub fn string_list(
    field: &str,
    values: Vec<String>,
    max_items: usize,
) -> Result<Vec<String>, ValidationError> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        let v = v.trim().to_string();
        if !v.is_empty() && !out.contains(&v) {
            out.push(v);
        }
    }
    if out.len() > max_items {
        return Err(ValidationError::out_of_range(
            field,
            0,
            max_items as i64,
            out.len() as i64,
        ));
    }
    Ok(out)
}

/// Image and avatar URLs must be absolute http(s) URLs.
pub fn url(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if (trimmed.starts_with("https://") || trimmed.starts_with("http://")) && trimmed.len() <= 2048
    {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::invalid_format(field, "expected an http(s) URL"))
    }
}

pub fn url_list(field: &str, values: Vec<String>, max_items: usize) -> Result<Vec<String>, ValidationError> {
    let list = string_list(field, values, max_items)?;
    list.iter().map(|u| url(field, u)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased() {
        assert_eq!(email("  Asha@Example.COM ").unwrap(), "asha@example.com");
    }

    #[test]
    fn email_rejects_malformed() {
        assert!(email("no-at-sign").is_err());
        assert!(email("a@b").is_err());
        assert!(email("a b@c.in").is_err());
        assert!(email("").is_err());
    }

    #[test]
    fn phone_accepts_plus_prefix() {
        assert!(phone("+919876543210").is_ok());
        assert!(phone("9876543210").is_ok());
        assert!(phone("98765").is_err());
        assert!(phone("98765-43210").is_err());
    }

    #[test]
    fn text_trims_and_bounds() {
        assert_eq!(text("name", "  Asha  ", 2, 10).unwrap(), "Asha");
        assert!(matches!(
            text("name", "   ", 2, 10),
            Err(ValidationError::EmptyField { .. })
        ));
        assert!(text("name", "A", 2, 10).is_err());
    }

    #[test]
    fn string_list_dedupes_and_caps() {
        let list = string_list("amenities", vec!["Gym".into(), " Gym ".into(), "".into()], 5).unwrap();
        assert_eq!(list, vec!["Gym".to_string()]);
        assert!(string_list("amenities", vec!["a".into(), "b".into()], 1).is_err());
    }

    #[test]
    fn amounts_are_capped() {
        assert_eq!(positive("price", MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        assert!(positive("price", MAX_AMOUNT + 1).is_err());
        assert!(positive("price", 0).is_err());
        assert_eq!(amount("cleaning_fee", 0).unwrap(), 0);
        assert!(amount("cleaning_fee", i64::MAX).is_err());
    }

    #[test]
    fn paise_rejects_overflow() {
        assert_eq!(paise("total", 2_499).unwrap(), 249_900);
        assert!(paise("total", i64::MAX / 10).is_err());
        assert!(paise("total", -1).is_err());
    }

    #[test]
    fn url_requires_scheme() {
        assert!(url("images", "https://res.cloudinary.com/x.jpg").is_ok());
        assert!(url("images", "ftp://x").is_err());
    }
}
