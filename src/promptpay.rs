//! PromptPay payload construction.
//! Pure EMVCo TLV builder for the credit-transfer QR format. Rendering the
//! payload into a scannable image happens client-side.

use bigdecimal::BigDecimal;
use thiserror::Error;
use uuid::Uuid;

use crate::validation;

/// PromptPay credit-transfer application id (EMV tag 29, subfield 00).
pub const PROMPTPAY_AID: &str = "A000000677010111";

const PAYLOAD_FORMAT_INDICATOR: &str = "01";
/// Point-of-initiation "12": dynamic QR, amount embedded.
const POI_DYNAMIC: &str = "12";
const CURRENCY_THB: &str = "764";
const COUNTRY_CODE: &str = "TH";
/// EMV tag 54 carries at most 13 characters.
const AMOUNT_MAX_LEN: usize = 13;
/// EMV tag 62 subfield 05 (reference label) carries at most 25 characters.
const REFERENCE_MAX_LEN: usize = 25;

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Invalid payee id: {0}")]
    InvalidPayeeId(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}

/// Short token embedded in the QR payload so a scanned payment traces back
/// to exactly one transaction row.
pub fn reference_token(id: Uuid) -> String {
    id.simple().to_string()[..12].to_uppercase()
}

/// Builds the full PromptPay payload string for `amount` payable to
/// `payee_id`, tagged with `reference`. Pure; fails only on malformed input.
pub fn build_payload(
    payee_id: &str,
    amount: &BigDecimal,
    reference: &str,
) -> Result<String, PayloadError> {
    validation::validate_promptpay_id(payee_id)
        .map_err(|e| PayloadError::InvalidPayeeId(e.to_string()))?;
    validation::validate_positive_amount(amount)
        .map_err(|e| PayloadError::InvalidAmount(e.to_string()))?;
    validation::validate_amount_scale(amount)
        .map_err(|e| PayloadError::InvalidAmount(e.to_string()))?;

    let amount_text = amount.with_scale(2).to_string();
    if amount_text.len() > AMOUNT_MAX_LEN {
        return Err(PayloadError::InvalidAmount(format!(
            "formatted amount exceeds {} characters",
            AMOUNT_MAX_LEN
        )));
    }

    if reference.is_empty()
        || reference.len() > REFERENCE_MAX_LEN
        || !reference.chars().all(|ch| ch.is_ascii_alphanumeric())
    {
        return Err(PayloadError::InvalidReference(format!(
            "must be 1-{} alphanumeric characters",
            REFERENCE_MAX_LEN
        )));
    }

    let merchant_info = format!(
        "{}{}",
        tlv("00", PROMPTPAY_AID),
        proxy_field(payee_id)
    );
    let additional_data = tlv("05", reference);

    let mut payload = String::new();
    payload.push_str(&tlv("00", PAYLOAD_FORMAT_INDICATOR));
    payload.push_str(&tlv("01", POI_DYNAMIC));
    payload.push_str(&tlv("29", &merchant_info));
    payload.push_str(&tlv("53", CURRENCY_THB));
    payload.push_str(&tlv("54", &amount_text));
    payload.push_str(&tlv("58", COUNTRY_CODE));
    payload.push_str(&tlv("62", &additional_data));

    // The CRC covers everything up to and including its own tag and length.
    payload.push_str("6304");
    let crc = crc16_ccitt(payload.as_bytes());
    payload.push_str(&format!("{:04X}", crc));

    Ok(payload)
}

/// EMV tag 29 proxy subfield: 01 = phone, 02 = national id, 03 = e-wallet.
/// Phone numbers are normalized to the 0066-prefixed form.
fn proxy_field(payee_id: &str) -> String {
    let digits: String = payee_id
        .chars()
        .filter(|ch| ch.is_ascii_digit())
        .collect();

    match digits.len() {
        validation::PHONE_LEN => tlv("01", &format!("0066{}", &digits[1..])),
        validation::NATIONAL_ID_LEN => tlv("02", &digits),
        _ => tlv("03", &digits),
    }
}

fn tlv(tag: &str, value: &str) -> String {
    format!("{}{:02}{}", tag, value.len(), value)
}

/// CRC-16/CCITT-FALSE: poly 0x1021, init 0xFFFF, no reflection.
fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
