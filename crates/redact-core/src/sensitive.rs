//! Sensitive data categories

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Category tag for a class of detected sensitive data.
///
/// The backend may report tags this client has never seen; those are kept
/// as `Other` and displayed generically instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SensitiveType {
    Aadhaar,
    Pan,
    Phone,
    Email,
    BankAccount,
    CreditDebitCard,
    Other(String),
}

impl SensitiveType {
    /// All built-in types, in the order the detector reports them
    pub const KNOWN: [SensitiveType; 6] = [
        SensitiveType::Aadhaar,
        SensitiveType::Pan,
        SensitiveType::Phone,
        SensitiveType::Email,
        SensitiveType::BankAccount,
        SensitiveType::CreditDebitCard,
    ];

    /// Tag as it appears on the wire
    pub fn wire_name(&self) -> &str {
        match self {
            SensitiveType::Aadhaar => "Aadhaar",
            SensitiveType::Pan => "PAN",
            SensitiveType::Phone => "Phone",
            SensitiveType::Email => "Email",
            SensitiveType::BankAccount => "Bank_Account",
            SensitiveType::CreditDebitCard => "Credit_Debit_Card",
            SensitiveType::Other(tag) => tag,
        }
    }

    /// Human-readable label ("Bank Account", "Credit Debit Card")
    pub fn display_name(&self) -> String {
        self.wire_name().replace('_', " ")
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SensitiveType::Other(_))
    }
}

/// Exact wire-name match. Any other tag, including case variants of a
/// known one, stays `Other` so the backend gets back the key it sent.
impl From<&str> for SensitiveType {
    fn from(tag: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|known| known.wire_name() == tag)
            .cloned()
            .unwrap_or_else(|| SensitiveType::Other(tag.to_string()))
    }
}

impl From<String> for SensitiveType {
    fn from(tag: String) -> Self {
        SensitiveType::from(tag.as_str())
    }
}

impl From<SensitiveType> for String {
    fn from(ty: SensitiveType) -> Self {
        match ty {
            SensitiveType::Other(tag) => tag,
            known => known.wire_name().to_string(),
        }
    }
}

/// Lenient parsing for operator input: case-insensitive on wire or
/// display name.
impl FromStr for SensitiveType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let tag = s.trim();
        Ok(Self::KNOWN
            .iter()
            .find(|known| {
                known.wire_name().eq_ignore_ascii_case(tag)
                    || known.display_name().eq_ignore_ascii_case(tag)
            })
            .cloned()
            .unwrap_or_else(|| SensitiveType::Other(tag.to_string())))
    }
}

impl fmt::Display for SensitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for ty in SensitiveType::KNOWN {
            assert_eq!(SensitiveType::from(ty.wire_name()), ty);
        }
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let ty = SensitiveType::from("Passport");
        assert_eq!(ty, SensitiveType::Other("Passport".to_string()));
        assert!(!ty.is_known());
        assert_eq!(ty.display_name(), "Passport");
    }

    #[test]
    fn test_display_name_replaces_every_underscore() {
        assert_eq!(
            SensitiveType::CreditDebitCard.display_name(),
            "Credit Debit Card"
        );
        assert_eq!(SensitiveType::BankAccount.display_name(), "Bank Account");
    }

    #[test]
    fn test_lenient_parsing() {
        assert_eq!("pan".parse::<SensitiveType>().unwrap(), SensitiveType::Pan);
        assert_eq!(
            "bank account".parse::<SensitiveType>().unwrap(),
            SensitiveType::BankAccount
        );
    }

    #[test]
    fn test_serde_uses_wire_name() {
        let json = serde_json::to_string(&SensitiveType::BankAccount).unwrap();
        assert_eq!(json, "\"Bank_Account\"");
        let parsed: SensitiveType = serde_json::from_str("\"Driving_Licence\"").unwrap();
        assert_eq!(parsed, SensitiveType::Other("Driving_Licence".to_string()));
    }

    #[test]
    fn test_wire_tags_match_exactly() {
        let parsed: SensitiveType = serde_json::from_str("\"phone\"").unwrap();
        assert_eq!(parsed, SensitiveType::Other("phone".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"phone\"");
        assert_eq!(SensitiveType::from("PAN"), SensitiveType::Pan);
        assert_eq!(SensitiveType::from("pan"), SensitiveType::Other("pan".to_string()));
    }
}
