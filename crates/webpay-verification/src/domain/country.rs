//! General per-country information about premium SMS billing.

use serde::Serialize;

/// Operators and VAT rate for one country.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CountryInfo {
    /// ISO 3166-1 alpha-2 code
    pub code: &'static str,
    /// Mobile operators the gateway reports for this country
    pub operators: &'static [&'static str],
    /// VAT rate in basis points (1900 = 19%)
    pub tax_basis_points: u32,
}

impl CountryInfo {
    pub fn has_operator(&self, operator: &str) -> bool {
        self.operators
            .iter()
            .any(|known| known.eq_ignore_ascii_case(operator))
    }

    /// Split a gross charge into the part without VAT, rounding down.
    pub fn charge_without_tax(&self, charge: u64) -> u64 {
        let net = u128::from(charge) * 10_000 / (10_000 + u128::from(self.tax_basis_points));
        u64::try_from(net).unwrap_or(charge)
    }
}

const COUNTRIES: &[CountryInfo] = &[
    CountryInfo {
        code: "DE",
        operators: &[
            "D1",
            "E-PLUS",
            "TALKLINE",
            "D2",
            "O2",
            "DEBITEL",
            "MOBILCOM",
            "PHONEHOUSE",
        ],
        tax_basis_points: 1900,
    },
    CountryInfo {
        code: "LT",
        operators: &["TELE2", "BITE", "OMNITEL"],
        tax_basis_points: 2100,
    },
];

/// All countries with known billing information.
pub fn countries() -> &'static [CountryInfo] {
    COUNTRIES
}

/// Look up a country by its two-letter code (any case).
pub fn country_info(code: &str) -> Option<&'static CountryInfo> {
    COUNTRIES
        .iter()
        .find(|info| info.code.eq_ignore_ascii_case(code))
}

/// Whether `operator` is a known operator in `country`.
pub fn is_known_operator(country: &str, operator: &str) -> bool {
    country_info(country).is_some_and(|info| info.has_operator(operator))
}
