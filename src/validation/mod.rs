use bigdecimal::BigDecimal;
use std::fmt;

pub const PHONE_LEN: usize = 10;
pub const NATIONAL_ID_LEN: usize = 13;
pub const EWALLET_ID_LEN: usize = 15;
/// Satang precision: amounts carry at most two fractional digits.
pub const AMOUNT_MAX_SCALE: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_positive_amount(amount: &BigDecimal) -> ValidationResult {
    if amount <= &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    Ok(())
}

pub fn validate_max_amount(amount: &BigDecimal, max: &BigDecimal) -> ValidationResult {
    if amount > max {
        return Err(ValidationError::new(
            "amount",
            format!("must not exceed {}", max),
        ));
    }

    Ok(())
}

pub fn validate_amount_scale(amount: &BigDecimal) -> ValidationResult {
    let (_, scale) = amount.normalized().as_bigint_and_exponent();
    if scale > AMOUNT_MAX_SCALE {
        return Err(ValidationError::new(
            "amount",
            format!("must have at most {} decimal places", AMOUNT_MAX_SCALE),
        ));
    }

    Ok(())
}

/// A PromptPay payee id is a Thai phone number (10 digits, leading 0),
/// a national id (13 digits), or an e-wallet id (15 digits).
pub fn validate_promptpay_id(payee_id: &str) -> ValidationResult {
    let payee_id = sanitize_string(payee_id);
    validate_required("promptpay_id", &payee_id)?;

    let digits: String = payee_id.chars().filter(|ch| *ch != '-').collect();

    if !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::new(
            "promptpay_id",
            "must contain only digits (dashes allowed as separators)",
        ));
    }

    match digits.len() {
        PHONE_LEN => {
            if !digits.starts_with('0') {
                return Err(ValidationError::new(
                    "promptpay_id",
                    "phone number must start with 0",
                ));
            }
        }
        NATIONAL_ID_LEN | EWALLET_ID_LEN => {}
        other => {
            return Err(ValidationError::new(
                "promptpay_id",
                format!(
                    "must be {} (phone), {} (national id) or {} (e-wallet) digits, got {}",
                    PHONE_LEN, NATIONAL_ID_LEN, EWALLET_ID_LEN, other
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn validates_required_field() {
        assert!(validate_required("field", "value").is_ok());
        assert!(validate_required("field", "   ").is_err());
    }

    #[test]
    fn sanitizes_string() {
        assert_eq!(sanitize_string("  hello\tworld  "), "hello world");
        assert_eq!(sanitize_string("single"), "single");
        assert_eq!(sanitize_string(" \n "), "");
        assert_eq!(sanitize_string("ab\u{0000}cd\u{0007}"), "abcd");
    }

    #[test]
    fn validates_positive_amount() {
        let positive = BigDecimal::from_str("1.23").expect("valid decimal");
        let zero = BigDecimal::from(0);
        let negative = BigDecimal::from(-1);

        assert!(validate_positive_amount(&positive).is_ok());
        assert!(validate_positive_amount(&zero).is_err());
        assert!(validate_positive_amount(&negative).is_err());
    }

    #[test]
    fn validates_max_amount() {
        let max = BigDecimal::from_str("100000.00").unwrap();

        assert!(validate_max_amount(&BigDecimal::from(500), &max).is_ok());
        assert!(validate_max_amount(&max.clone(), &max).is_ok());
        assert!(validate_max_amount(&BigDecimal::from_str("100000.01").unwrap(), &max).is_err());
    }

    #[test]
    fn validates_amount_scale() {
        assert!(validate_amount_scale(&BigDecimal::from_str("50").unwrap()).is_ok());
        assert!(validate_amount_scale(&BigDecimal::from_str("50.5").unwrap()).is_ok());
        assert!(validate_amount_scale(&BigDecimal::from_str("50.55").unwrap()).is_ok());
        // Trailing zeros are not significant digits
        assert!(validate_amount_scale(&BigDecimal::from_str("50.5500").unwrap()).is_ok());
        assert!(validate_amount_scale(&BigDecimal::from_str("50.555").unwrap()).is_err());
    }

    #[test]
    fn validates_promptpay_phone() {
        assert!(validate_promptpay_id("0812345678").is_ok());
        assert!(validate_promptpay_id("081-234-5678").is_ok());
        assert!(validate_promptpay_id("  0812345678  ").is_ok());
        assert!(validate_promptpay_id("8812345678").is_err());
        assert!(validate_promptpay_id("081234567").is_err());
    }

    #[test]
    fn validates_promptpay_national_id() {
        assert!(validate_promptpay_id("1234567890123").is_ok());
        assert!(validate_promptpay_id("1-2345-67890-12-3").is_ok());
    }

    #[test]
    fn validates_promptpay_ewallet_id() {
        assert!(validate_promptpay_id("123456789012345").is_ok());
    }

    #[test]
    fn rejects_malformed_promptpay_id() {
        assert!(validate_promptpay_id("").is_err());
        assert!(validate_promptpay_id("08123A5678").is_err());
        assert!(validate_promptpay_id("12345678901234").is_err());
    }
}
