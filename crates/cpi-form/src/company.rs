//! # Scalar Company Attributes
//!
//! The non-list portion of the form: identity, classification, listing
//! info, and the optional logo upload. Only `name` and `sector` are
//! required anywhere in the wizard — everything else may stay blank for
//! the life of the record.

use serde::{Deserialize, Serialize};

use crate::value::{FieldValue, FileAttachment};

/// Scalar company attributes edited on step 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub name: String,
    pub registration_number: String,
    pub tax_number: String,
    pub sector: String,
    pub industry: String,
    pub company_status: String,
    pub founded_date: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub is_listed: bool,
    pub stock_exchange: String,
    pub ticker_symbol: String,
    pub employee_count: String,
    pub logo: Option<FileAttachment>,
}

impl CompanyDetails {
    /// Resolve the wizard's string field name and apply the value.
    /// Returns `false` for an unknown name or a mismatched value kind.
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "name" => Self::text(&mut self.name, value),
            "registration_number" => Self::text(&mut self.registration_number, value),
            "tax_number" => Self::text(&mut self.tax_number, value),
            "sector" => Self::text(&mut self.sector, value),
            "industry" => Self::text(&mut self.industry, value),
            "company_status" => Self::text(&mut self.company_status, value),
            "founded_date" => Self::text(&mut self.founded_date, value),
            "website" => Self::text(&mut self.website, value),
            "email" => Self::text(&mut self.email, value),
            "phone" => Self::text(&mut self.phone, value),
            "description" => Self::text(&mut self.description, value),
            "is_listed" => match value.as_flag() {
                Some(b) => {
                    self.is_listed = b;
                    true
                }
                None => false,
            },
            "stock_exchange" => Self::text(&mut self.stock_exchange, value),
            "ticker_symbol" => Self::text(&mut self.ticker_symbol, value),
            "employee_count" => Self::text(&mut self.employee_count, value),
            "logo" => match value.as_file() {
                Some(f) => {
                    self.logo = Some(f.clone());
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn text(slot: &mut String, value: &FieldValue) -> bool {
        match value.as_text() {
            Some(s) => {
                *slot = s.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_scalar_fields() {
        let mut company = CompanyDetails::default();
        assert!(company.set_field("name", &FieldValue::text("Acme")));
        assert!(company.set_field("sector", &FieldValue::text("technology")));
        assert!(company.set_field("is_listed", &FieldValue::Flag(true)));
        assert_eq!(company.name, "Acme");
        assert_eq!(company.sector, "technology");
        assert!(company.is_listed);
    }

    #[test]
    fn test_logo_requires_file_value() {
        let mut company = CompanyDetails::default();
        assert!(!company.set_field("logo", &FieldValue::text("logo.png")));
        let file = FileAttachment::new("logo.png", "image/png", vec![0u8; 4]);
        assert!(company.set_field("logo", &FieldValue::File(file)));
        assert!(company.logo.is_some());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut company = CompanyDetails::default();
        assert!(!company.set_field("ceo_name", &FieldValue::text("x")));
    }
}
