//! Countries the logistics partner ships to.

/// ISO 3166-1 alpha-2 codes of every supported destination.
pub const SUPPORTED_COUNTRIES: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "EE", "FR", "DE", "GR", "HU", "IE", "IT", "LV", "LT",
    "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "GB",
];

/// Returns true if `code` (any case) is a supported country.
pub fn is_supported_country(code: &str) -> bool {
    let code = code.trim();
    SUPPORTED_COUNTRIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(code))
}
