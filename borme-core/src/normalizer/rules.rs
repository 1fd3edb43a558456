// Per-field normalization rules
//
// Each rule converts one raw value and reports failure as a FieldError;
// the caller decides what an absent field means.

use crate::error::FieldError;
use crate::types::{fields, CompanyType};
use chrono::NaiveDate;

/// Byte sequences left behind when UTF-8 text was decoded as Windows-1252
const MOJIBAKE: [(&str, &str); 5] = [
    ("Ã³", "ó"),
    ("Ã‘", "Ñ"),
    ("Ã'", "Ñ"),
    ("Ã\u{ad}", "í"),
    ("Ãº", "ú"),
];

const DATE_FORMAT: &str = "%d.%m.%y";

/// Replace known mojibake sequences with the characters they stand for
pub fn repair_encoding(text: &str) -> String {
    MOJIBAKE
        .iter()
        .fold(text.to_string(), |acc, (broken, fixed)| acc.replace(broken, fixed))
}

/// Encoding repair plus removal of thousands-separator commas
pub fn clean_value(value: &str) -> String {
    repair_encoding(value).replace(',', "")
}

/// `dd.mm.yy` date of the start of operations
pub fn parse_operations_date(value: &str) -> Result<NaiveDate, FieldError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| FieldError::new(fields::OPERATIONS_START, value, e.to_string()))
}

/// Capital amount, with "." thousands separators, optionally after a label
pub fn parse_capital(value: &str) -> Result<u64, FieldError> {
    let amount = value.split_once(':').map(|(_, v)| v).unwrap_or(value);
    let digits = amount.replace('.', "");
    let digits = digits.trim();
    if digits.is_empty() {
        return Err(FieldError::new(fields::CAPITAL, value, "no amount"));
    }
    digits
        .parse::<u64>()
        .map_err(|e| FieldError::new(fields::CAPITAL, value, e.to_string()))
}

/// Legal form from the suffix of the company name
pub fn classify_company(name: &str) -> CompanyType {
    if name.contains("SL.") {
        CompanyType::LimitedLiability
    } else if name.contains("SA.") {
        CompanyType::PublicLimited
    } else {
        CompanyType::Unspecified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_mojibake() {
        assert_eq!(repair_encoding("ConstituciÃ³n"), "Constitución");
        assert_eq!(repair_encoding("ESPAÃ‘A"), "ESPAÑA");
        assert_eq!(repair_encoding("ESPAÃ'A"), "ESPAÑA");
        assert_eq!(repair_encoding("CompaÃ\u{ad}a"), "Compaía");
        assert_eq!(repair_encoding("Ãºnico"), "único");
        assert_eq!(repair_encoding("intacto"), "intacto");
    }

    #[test]
    fn clean_value_strips_commas() {
        assert_eq!(clean_value("60.000,00"), "60.00000");
        assert_eq!(clean_value("a, b, c"), "a b c");
    }

    #[test]
    fn parses_two_digit_year_dates() {
        assert_eq!(
            parse_operations_date("01.01.20").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert_eq!(
            parse_operations_date(" 15.06.98 ").unwrap(),
            NaiveDate::from_ymd_opt(1998, 6, 15).unwrap()
        );
    }

    #[test]
    fn bad_dates_fail_the_field() {
        for value in ["", "31.02.20", "2020-01-01", "la fecha de su otorgamiento"] {
            let err = parse_operations_date(value).unwrap_err();
            assert_eq!(err.field, fields::OPERATIONS_START);
        }
    }

    #[test]
    fn parses_capital_amounts() {
        assert_eq!(parse_capital("3.000").unwrap(), 3000);
        assert_eq!(parse_capital(": 3.000").unwrap(), 3000);
        assert_eq!(parse_capital("Capital: 1.500.000").unwrap(), 1_500_000);
    }

    #[test]
    fn bad_capital_fails_the_field() {
        for value in ["", ":", "3.000 Euros", "abc"] {
            let err = parse_capital(value).unwrap_err();
            assert_eq!(err.field, fields::CAPITAL, "{value:?}");
        }
    }

    #[test]
    fn classifies_company_types_in_order() {
        assert_eq!(classify_company("ACME SL."), CompanyType::LimitedLiability);
        assert_eq!(classify_company("BETA SA."), CompanyType::PublicLimited);
        assert_eq!(classify_company("SA. Y SL. HOLDING"), CompanyType::LimitedLiability);
        assert_eq!(classify_company("GAMMA SLU"), CompanyType::Unspecified);
    }
}
