use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, ValueObject};

/// Postal address used for shipping and billing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub street_address_1: String,
    pub street_address_2: String,
    pub city: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 code, e.g. "PL".
    pub country: String,
    pub phone: String,
}

impl ValueObject for Address {}

impl Address {
    pub fn validate(&self) -> DomainResult<()> {
        let required = [
            ("first_name", &self.first_name),
            ("street_address_1", &self.street_address_1),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::required(field));
            }
        }

        let country = self.country.trim();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::validation(
                "country",
                format!("invalid country code: {country}"),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ErrorCode;

    fn valid() -> Address {
        Address {
            first_name: "John".into(),
            last_name: "Doe".into(),
            street_address_1: "Tęczowa 7".into(),
            city: "Wroclaw".into(),
            postal_code: "53-601".into(),
            country: "PL".into(),
            ..Address::default()
        }
    }

    #[test]
    fn complete_address_is_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn blank_city_is_required() {
        let mut addr = valid();
        addr.city = "   ".into();
        match addr.validate().unwrap_err() {
            DomainError::Validation { field, code, .. } => {
                assert_eq!(field, "city");
                assert_eq!(code, ErrorCode::Required);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn lowercase_country_is_invalid() {
        let mut addr = valid();
        addr.country = "pl".into();
        assert!(matches!(
            addr.validate(),
            Err(DomainError::Validation { code: ErrorCode::Invalid, .. })
        ));
    }
}
