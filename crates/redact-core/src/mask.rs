//! Display masking for detected values
//!
//! Only affects what the operator sees. The value sent to the backend is
//! always the raw detected string.

use lazy_static::lazy_static;
use regex::Regex;

use crate::SensitiveType;

lazy_static! {
    static ref AADHAAR: Regex = Regex::new(r"(\d{4})\s?(\d{4})\s?(\d{4})").unwrap();
    static ref PAN: Regex = Regex::new(r"([A-Z]{4})([A-Z])(\d{4})([A-Z])").unwrap();
    static ref PHONE: Regex = Regex::new(r"(\+\d{1,3}[-\s]?)?(\d{3,4})(\d{3})(\d{4})").unwrap();
    static ref CARD: Regex =
        Regex::new(r"(\d{4})[\s-]?(\d{4})[\s-]?(\d{4})[\s-]?(\d{4})").unwrap();
}

/// Render a detected value with its sensitive middle hidden.
///
/// Only the first match is masked. Values that don't match their type's
/// pattern, emails and unknown types are shown unchanged.
pub fn mask_value(ty: &SensitiveType, value: &str) -> String {
    match ty {
        SensitiveType::Aadhaar => AADHAAR.replace(value, "${1} **** ****").into_owned(),
        SensitiveType::Pan => PAN.replace(value, "${1}${2}****${4}").into_owned(),
        SensitiveType::Phone => PHONE.replace(value, "${1}${2} *** ${4}").into_owned(),
        SensitiveType::CreditDebitCard => {
            CARD.replace(value, "${1} **** **** ${4}").into_owned()
        }
        SensitiveType::BankAccount => mask_tail(value, 4),
        SensitiveType::Email | SensitiveType::Other(_) => value.to_string(),
    }
}

fn mask_tail(value: &str, keep: usize) -> String {
    let len = value.chars().count();
    if len <= keep {
        return value.to_string();
    }
    let head: String = value.chars().take(keep).collect();
    format!("{}{}", head, "*".repeat(len - keep))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aadhaar() {
        assert_eq!(
            mask_value(&SensitiveType::Aadhaar, "1234 5678 9012"),
            "1234 **** ****"
        );
        assert_eq!(
            mask_value(&SensitiveType::Aadhaar, "123456789012"),
            "1234 **** ****"
        );
    }

    #[test]
    fn test_pan() {
        assert_eq!(mask_value(&SensitiveType::Pan, "ABCDE1234F"), "ABCDE****F");
    }

    #[test]
    fn test_phone() {
        assert_eq!(mask_value(&SensitiveType::Phone, "9876543210"), "987 *** 3210");
        assert_eq!(
            mask_value(&SensitiveType::Phone, "+91 9876543210"),
            "+91 987 *** 3210"
        );
    }

    #[test]
    fn test_card() {
        assert_eq!(
            mask_value(&SensitiveType::CreditDebitCard, "4111-1111-1111-1234"),
            "4111 **** **** 1234"
        );
    }

    #[test]
    fn test_bank_account() {
        assert_eq!(
            mask_value(&SensitiveType::BankAccount, "123456789012"),
            "1234********"
        );
        assert_eq!(mask_value(&SensitiveType::BankAccount, "1234"), "1234");
    }

    #[test]
    fn test_unmasked_types() {
        assert_eq!(mask_value(&SensitiveType::Email, "a@b.com"), "a@b.com");
        assert_eq!(
            mask_value(&SensitiveType::Other("Passport".into()), "K1234567"),
            "K1234567"
        );
    }

    #[test]
    fn test_non_matching_value_unchanged() {
        assert_eq!(mask_value(&SensitiveType::Aadhaar, "12-34"), "12-34");
    }
}
