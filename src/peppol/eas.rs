//! Electronic Address Scheme (EAS) codes for endpoint identification.

/// Common EAS codes for Peppol participant identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EasScheme {
    /// Numeric scheme code (e.g. "0088", "9930").
    pub code: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

impl EasScheme {
    /// Email address.
    pub const EMAIL: Self = Self {
        code: "EM",
        description: "Email",
    };
    /// GS1 GLN (Global Location Number).
    pub const GLN: Self = Self {
        code: "0088",
        description: "GS1 GLN",
    };
    /// German Leitweg-ID (public sector routing).
    pub const LEITWEG_ID: Self = Self {
        code: "0204",
        description: "Leitweg-ID",
    };
    /// German VAT number.
    pub const DE_VAT: Self = Self {
        code: "9930",
        description: "German VAT number",
    };
    /// Italian Codice Fiscale.
    pub const IT_CF: Self = Self {
        code: "0210",
        description: "Italian Codice Fiscale",
    };
    /// Polish NIP.
    pub const PL_NIP: Self = Self {
        code: "9945",
        description: "Polish VAT number",
    };
    /// Dutch KvK number.
    pub const NL_KVK: Self = Self {
        code: "0106",
        description: "Dutch KvK",
    };
    /// French SIRENE.
    pub const FR_SIRENE: Self = Self {
        code: "0002",
        description: "French SIRENE",
    };
    /// Romanian VAT number.
    pub const RO_VAT: Self = Self {
        code: "9947",
        description: "Romanian VAT number",
    };
}

/// Default EAS scheme for a country — the identifier type most commonly
/// routed in that jurisdiction.
pub fn eas_scheme_for_country(country_code: &str) -> Option<EasScheme> {
    match country_code.to_ascii_uppercase().as_str() {
        "DE" => Some(EasScheme::LEITWEG_ID),
        "IT" => Some(EasScheme::IT_CF),
        "PL" => Some(EasScheme::PL_NIP),
        "NL" => Some(EasScheme::NL_KVK),
        "FR" => Some(EasScheme::FR_SIRENE),
        "RO" => Some(EasScheme::RO_VAT),
        _ => None,
    }
}

/// Resolve the scheme for an electronic address.
///
/// An explicit scheme wins. Otherwise: a value containing '@' is an
/// email ('EM'); a `NNNN:` prefix is that EAS scheme with the prefix
/// stripped from the value; anything else defaults to 'EM'.
pub fn detect_scheme<'a>(scheme: &'a str, value: &'a str) -> (&'a str, &'a str) {
    if !scheme.trim().is_empty() {
        return (scheme, value);
    }
    if value.contains('@') {
        return ("EM", value);
    }
    if let Some((prefix, rest)) = value.split_once(':') {
        if prefix.len() == 4 && prefix.chars().all(|c| c.is_ascii_digit()) {
            return (prefix, rest);
        }
    }
    ("EM", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_scheme_wins() {
        assert_eq!(detect_scheme("0204", "991-12345-67"), ("0204", "991-12345-67"));
    }

    #[test]
    fn email_is_detected() {
        assert_eq!(detect_scheme("", "billing@firma.de"), ("EM", "billing@firma.de"));
    }

    #[test]
    fn four_digit_prefix_is_detected() {
        assert_eq!(detect_scheme("", "0088:4012345000009"), ("0088", "4012345000009"));
    }

    #[test]
    fn non_numeric_prefix_defaults_to_email() {
        assert_eq!(detect_scheme("", "urn:foo"), ("EM", "urn:foo"));
        assert_eq!(detect_scheme("", "plain-id"), ("EM", "plain-id"));
    }

    #[test]
    fn country_defaults() {
        assert_eq!(eas_scheme_for_country("DE").unwrap().code, "0204");
        assert_eq!(eas_scheme_for_country("it").unwrap().code, "0210");
        assert!(eas_scheme_for_country("XX").is_none());
    }
}
