//! PII masking. Runs before feature extraction; only masked text is ever stored.

use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_TOKEN: &str = "[EMAIL]";
pub const PHONE_TOKEN: &str = "[PHONE]";
pub const SSN_TOKEN: &str = "[SSN]";
pub const CARD_TOKEN: &str = "[CARD]";
pub const ADDRESS_TOKEN: &str = "[ADDRESS]";

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

static RE_CARD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b").unwrap());

static RE_SSN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap());

static RE_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,2}[\s.-]?)?(?:\(\d{3}\)|\b\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});

static RE_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d+\s+[A-Za-z ]{1,40}?\b(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd)\b\.?",
    )
    .unwrap()
});

/// Replaces emails, card numbers, SSNs, phone numbers and street addresses with fixed
/// tokens. Cards and SSNs go before phones so their digits are not half-masked.
pub fn mask_pii(text: &str) -> String {
    let masked = RE_EMAIL.replace_all(text, EMAIL_TOKEN);
    let masked = RE_CARD.replace_all(&masked, CARD_TOKEN);
    let masked = RE_SSN.replace_all(&masked, SSN_TOKEN);
    let masked = RE_PHONE.replace_all(&masked, PHONE_TOKEN);
    let masked = RE_ADDRESS.replace_all(&masked, ADDRESS_TOKEN);
    masked.into_owned()
}
