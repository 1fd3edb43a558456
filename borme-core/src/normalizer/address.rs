use crate::error::FieldError;
use crate::types::{fields, StreetType};

/// Street prefixes as printed in the bulletin, checked in order
const STREET_PREFIXES: [(&str, StreetType); 5] = [
    ("C/", StreetType::Street),
    ("PLAZA", StreetType::Square),
    ("CTRA", StreetType::Road),
    ("AVDA", StreetType::Avenue),
    ("PASEO", StreetType::Promenade),
];

/// Components recovered from a "Domicilio" value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub full: String,
    pub city: Option<String>,
    pub street_type: StreetType,
    pub street_number: Option<u32>,
    pub street_name: String,
}

impl Address {
    /// Break an address into its parts. Parts that cannot be recovered are
    /// left absent and reported alongside.
    pub fn parse(value: &str) -> (Self, Vec<FieldError>) {
        let mut failures = Vec::new();

        let (street, city) = split_city(value);
        let city = match city {
            Ok(city) => Some(city),
            Err(err) => {
                failures.push(err);
                None
            }
        };

        let (street_type, street) = classify_street(street);
        let (street_number, street_name) = match split_number(street) {
            (Ok(number), name) => (number, name),
            (Err(err), name) => {
                failures.push(err);
                (None, name)
            }
        };

        let address = Self {
            full: value.to_string(),
            city,
            street_type,
            street_number,
            street_name,
        };
        (address, failures)
    }
}

/// `STREET (CITY)` → street part and lowercased city
pub fn split_city(value: &str) -> (&str, Result<String, FieldError>) {
    match value.split_once('(') {
        Some((street, city)) => (street, Ok(city.replace(')', "").to_lowercase())),
        None => (
            value,
            Err(FieldError::new(
                fields::ADDRESS,
                value,
                "no parenthesized city",
            )),
        ),
    }
}

/// Street type from the prefix; the "C/" prefix itself is dropped
pub fn classify_street(street: &str) -> (StreetType, &str) {
    for (prefix, street_type) in STREET_PREFIXES {
        if street.starts_with(prefix) {
            let rest = match street_type {
                StreetType::Street => &street[prefix.len()..],
                _ => street,
            };
            return (street_type, rest);
        }
    }
    (StreetType::Unspecified, street)
}

fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Words before the first all-digit token form the name; that token is the number
pub fn split_number(street: &str) -> (Result<Option<u32>, FieldError>, String) {
    let mut name_words = Vec::new();
    let mut number = Ok(None);

    for token in street.split_whitespace() {
        if is_number(token) {
            number = token
                .parse::<u32>()
                .map(Some)
                .map_err(|e| FieldError::new(fields::ADDRESS, token, e.to_string()));
            break;
        }
        name_words.push(token);
    }

    let name = name_words.join(" ").to_lowercase().trim().to_string();
    (number, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_street_address() {
        let (address, failures) = Address::parse("C/ Mayor 45 (Madrid).");

        assert!(failures.is_empty());
        assert_eq!(
            address,
            Address {
                full: "C/ Mayor 45 (Madrid).".to_string(),
                city: Some("madrid.".to_string()),
                street_type: StreetType::Street,
                street_number: Some(45),
                street_name: "mayor".to_string(),
            }
        );
    }

    #[test]
    fn recognizes_every_prefix() {
        let cases = [
            ("PLAZA ESPAÑA 1 (LEON)", StreetType::Square, "plaza españa"),
            ("CTRA DE BURGOS KM 7 (SORIA)", StreetType::Road, "ctra de burgos km"),
            ("AVDA DIAGONAL 640 (BARCELONA)", StreetType::Avenue, "avda diagonal"),
            ("PASEO DE GRACIA 2 (BARCELONA)", StreetType::Promenade, "paseo de gracia"),
            ("CALLE REAL 3 (CADIZ)", StreetType::Unspecified, "calle real"),
        ];

        for (value, street_type, name) in cases {
            let (address, _) = Address::parse(value);
            assert_eq!(address.street_type, street_type, "{value}");
            assert_eq!(address.street_name, name, "{value}");
        }
    }

    #[test]
    fn missing_city_is_a_field_failure() {
        let (address, failures) = Address::parse("C/ Sol 2");

        assert_eq!(address.city, None);
        assert_eq!(address.street_number, Some(2));
        assert_eq!(address.street_name, "sol");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, fields::ADDRESS);
    }

    #[test]
    fn no_numeric_token_leaves_number_absent() {
        let (address, failures) = Address::parse("C/ Sin Numero S/N (Toledo)");

        assert!(failures.is_empty());
        assert_eq!(address.street_number, None);
        assert_eq!(address.street_name, "sin numero s/n");
    }

    #[test]
    fn only_fully_numeric_tokens_count() {
        let (number, name) = split_number(" Mayor 45B 7 ");
        assert_eq!(number.unwrap(), Some(7));
        assert_eq!(name, "mayor 45b");
    }

    #[test]
    fn overflowing_number_is_reported() {
        let (address, failures) = Address::parse("C/ Larga 99999999999 (Cuenca)");

        assert_eq!(address.street_number, None);
        assert_eq!(address.street_name, "larga");
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn city_keeps_everything_after_the_parenthesis() {
        let (street, city) = split_city("C/ Real 1 (San Sebastián (Gipuzkoa)).");
        assert_eq!(street, "C/ Real 1 ");
        assert_eq!(city.unwrap(), "san sebastián (gipuzkoa.");
    }
}
