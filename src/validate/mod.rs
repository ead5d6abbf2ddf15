//! Field and record validation.
//!
//! Every failure carries a specific, human-readable reason. Checks on a whole
//! draft collect all failures so they can be shown together.

pub mod contact;
pub mod document;

use std::fmt;
use thiserror::Error;

use crate::models::{CompanyDraft, Identifier};
pub use contact::{is_valid_email, validate_email, validate_phone, validate_url};
pub use document::{digits_only, is_valid_cnpj, is_valid_cpf, is_valid_license};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid CNPJ: check digits do not match")]
    InvalidCnpj,
    #[error("Invalid CPF: check digits do not match")]
    InvalidCpf,
    #[error("Invalid license number: use at least 3 letters or digits")]
    InvalidLicense,
    #[error("Invalid region code: {0}")]
    InvalidRegion(String),
    #[error("Internal account owner is required")]
    MissingAccountOwner,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Phone must have 10 or 11 digits, got {0}")]
    PhoneLength(usize),
    #[error("Phone cannot be a single repeated digit")]
    PhoneRepeatedDigits,
    #[error("Unknown area code: {0}")]
    PhoneAreaCode(String),
    #[error("Mobile numbers must start with 9 after the area code")]
    PhoneMobilePrefix,
    #[error("Invalid website URL")]
    InvalidUrl,
    #[error("Postal code must have 8 digits")]
    InvalidPostalCode,
    #[error("Commission must be between 0 and 100, got {0}")]
    InvalidCommission(f64),
    #[error("Follow-up date must be after the last contact")]
    FollowUpNotAfterLastContact,
}

/// All failures found in one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn contains(&self, err: &ValidationError) -> bool {
        self.0.contains(err)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", reasons.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_identifier(identifier: &Identifier) -> Result<(), ValidationError> {
    match identifier {
        Identifier::Cnpj { number } => {
            if number.is_empty() {
                Err(ValidationError::MissingField("CNPJ"))
            } else if is_valid_cnpj(number) {
                Ok(())
            } else {
                Err(ValidationError::InvalidCnpj)
            }
        }
        Identifier::Cpf { number } => {
            if number.is_empty() {
                Err(ValidationError::MissingField("CPF"))
            } else if is_valid_cpf(number) {
                Ok(())
            } else {
                Err(ValidationError::InvalidCpf)
            }
        }
        Identifier::License { number, region } => {
            if !document::is_valid_region(region) {
                Err(ValidationError::InvalidRegion(region.clone()))
            } else if is_valid_license(number, region) {
                Ok(())
            } else {
                Err(ValidationError::InvalidLicense)
            }
        }
    }
}

/// Check a submission before it may be persisted.
pub fn validate_draft(draft: &CompanyDraft) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if draft.name.trim().is_empty() {
        errors.push(ValidationError::MissingField("name"));
    }
    if let Err(e) = validate_identifier(&draft.identifier) {
        errors.push(e);
    }
    if draft.account_owner.trim().is_empty() {
        errors.push(ValidationError::MissingAccountOwner);
    }
    if let Err(e) = validate_email(&draft.email) {
        errors.push(e);
    }
    if let Err(e) = validate_phone(&draft.phone) {
        errors.push(e);
    }
    if let Some(ref website) = draft.website {
        if let Err(e) = validate_url(website) {
            errors.push(e);
        }
    }

    let postal = digits_only(&draft.postal_code);
    if !draft.postal_code.trim().is_empty() && postal.len() != 8 {
        errors.push(ValidationError::InvalidPostalCode);
    }

    if !draft.commission_rate.is_finite() || !(0.0..=100.0).contains(&draft.commission_rate) {
        errors.push(ValidationError::InvalidCommission(draft.commission_rate));
    }

    if let (Some(last), Some(next)) = (draft.last_contact, draft.next_contact) {
        if next <= last {
            errors.push(ValidationError::FollowUpNotAfterLastContact);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_draft, IdentifierKind};
    use chrono::NaiveDate;

    #[test]
    fn test_sample_draft_is_valid() {
        assert_eq!(validate_draft(&sample_draft()), Ok(()));
    }

    #[test]
    fn test_follow_up_must_be_after_last_contact() {
        let mut draft = sample_draft();
        let day = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        draft.last_contact = Some(day);
        draft.next_contact = Some(day);

        let errors = validate_draft(&draft).unwrap_err();
        assert!(errors.contains(&ValidationError::FollowUpNotAfterLastContact));

        draft.next_contact = day.pred_opt();
        assert!(validate_draft(&draft).is_err());

        draft.next_contact = day.succ_opt();
        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn test_collects_every_failure() {
        let mut draft = sample_draft();
        draft.account_owner = "  ".to_string();
        draft.email = "nope".to_string();
        draft.phone = "11899999999".to_string();
        draft.website = Some("not a url".to_string());

        let errors = validate_draft(&draft).unwrap_err();
        assert_eq!(
            errors.0,
            vec![
                ValidationError::MissingAccountOwner,
                ValidationError::InvalidEmail,
                ValidationError::PhoneMobilePrefix,
                ValidationError::InvalidUrl,
            ]
        );
        assert!(errors.to_string().contains("Internal account owner is required"));
    }

    #[test]
    fn test_identifier_must_match_kind() {
        let mut draft = sample_draft();
        draft.identifier = Identifier::new(IdentifierKind::Cpf, "11222333000181", None);
        assert!(validate_draft(&draft)
            .unwrap_err()
            .contains(&ValidationError::InvalidCpf));

        draft.identifier = Identifier::new(IdentifierKind::Cpf, "529.982.247-25", None);
        assert!(validate_draft(&draft).is_ok());

        draft.identifier = Identifier::new(IdentifierKind::License, "12345-J", Some("ZZ"));
        assert!(validate_draft(&draft)
            .unwrap_err()
            .contains(&ValidationError::InvalidRegion("ZZ".to_string())));

        draft.identifier = Identifier::new(IdentifierKind::License, "12345-J", Some("sp"));
        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn test_optional_website_and_postal_code() {
        let mut draft = sample_draft();
        draft.website = None;
        draft.postal_code = String::new();
        assert!(validate_draft(&draft).is_ok());

        draft.postal_code = "0131".to_string();
        assert!(validate_draft(&draft)
            .unwrap_err()
            .contains(&ValidationError::InvalidPostalCode));
    }

    #[test]
    fn test_commission_range() {
        let mut draft = sample_draft();
        draft.commission_rate = 120.0;
        assert!(validate_draft(&draft).is_err());
        draft.commission_rate = f64::NAN;
        assert!(validate_draft(&draft).is_err());
        draft.commission_rate = 0.0;
        assert!(validate_draft(&draft).is_ok());
    }
}
