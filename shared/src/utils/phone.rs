//! Phone number utilities for the Ghanaian numbering plan.
//!
//! Recipients are normalized to the international national-significant
//! form the gateway expects: `233` followed by a two-digit mobile operator
//! prefix and a seven-digit subscriber number, no leading `+`.

use once_cell::sync::Lazy;
use regex::Regex;

// Ghana mobile numbers: country code 233, operator prefix, 7-digit subscriber
static GHANA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^233(20|2[3-8]|50|5[3-7]|59)\d{7}$").unwrap()
});

/// Strip formatting characters, the leading `+`, and convert the local
/// `0XXXXXXXXX` form to the international `233XXXXXXXXX` form.
pub fn normalize_recipient(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    if digits.len() == 10 && digits.starts_with('0') {
        format!("233{}", &digits[1..])
    } else {
        digits
    }
}

/// Check a normalized recipient against the supported numbering plan
pub fn is_valid_recipient(phone: &str) -> bool {
    GHANA_MOBILE_REGEX.is_match(phone)
}

/// Mask a phone number for logging (e.g. 233****4567)
pub fn mask_phone(phone: &str) -> String {
    if phone.len() >= 7 {
        format!("{}****{}", &phone[0..3], &phone[phone.len() - 4..])
    } else {
        "****".to_string()
    }
}
