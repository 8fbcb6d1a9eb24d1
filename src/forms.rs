// Copyright 2025 Pulvetech
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Form field validation, phone masking and submission state.
//!
//! Two independent form instances use this module: the certification form
//! and the contact form. Validation runs when a field loses focus; typing
//! into a field only clears a previous invalid marker, it never asserts
//! validity early.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use pulvetech_api::{ContactRequest, NewCertification};
use regex::Regex;
use std::path::PathBuf;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    // Brazilian landline/mobile: (DD) DDDD-DDDD or (DD) DDDDD-DDDD
    static ref PHONE_RE: Regex = Regex::new(r"^\(\d{2}\) \d{4,5}-\d{4}$").unwrap();
}

/// Semantic type of a form field, driving blur-time validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Date,
}

/// Validity marker of a field, mirrored in the UI as a colored border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validity {
    /// Not validated yet, or cleared by typing.
    #[default]
    Unset,
    Valid,
    Invalid,
}

/// One text field with its validity marker.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    pub value: String,
    pub validity: Validity,
}

impl FieldState {
    /// Typing clears only the invalid marker; the field stays unasserted
    /// until the next blur.
    pub fn on_changed(&mut self) {
        if self.validity == Validity::Invalid {
            self.validity = Validity::Unset;
        }
    }

    /// Blur-time validation for a field of the given kind.
    pub fn on_blur(&mut self, kind: FieldKind, required: bool) {
        self.validity = validate(&self.value, kind, required);
    }

    pub fn reset(&mut self) {
        self.value.clear();
        self.validity = Validity::Unset;
    }
}

/// Validate a raw field value.
#[must_use]
pub fn validate(value: &str, kind: FieldKind, required: bool) -> Validity {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return if required {
            Validity::Invalid
        } else {
            Validity::Unset
        };
    }

    let ok = match kind {
        FieldKind::Text => true,
        FieldKind::Email => is_valid_email(trimmed),
        FieldKind::Phone => is_valid_phone(trimmed),
        FieldKind::Date => parse_date(trimmed).is_some(),
    };

    if ok {
        Validity::Valid
    } else {
        Validity::Invalid
    }
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Dates are entered as `dd/mm/aaaa`; the ISO form is also accepted.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

/// Re-apply the phone mask after a keystroke.
///
/// Strips everything that is not a digit, keeps at most 11 digits, and
/// re-inserts the literal `(`, `)`, space and hyphen according to how many
/// digits are present: `(DD) `, then the local number, with the hyphen
/// placed before the final four digits once ten digits exist.
#[must_use]
pub fn format_phone(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(11)
        .collect();

    match digits.len() {
        0..=1 => digits,
        2..=9 => format!("({}) {}", &digits[..2], &digits[2..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}

/// Submit-control state; `Busy` disables the control and swaps its label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Busy,
}

/// Values of the "Adicionar Certificação" modal form.
#[derive(Debug, Clone, Default)]
pub struct CertificationForm {
    pub pilot_name: FieldState,
    pub cert_type: FieldState,
    pub issue_date: FieldState,
    pub expiry_date: FieldState,
    pub file: Option<PathBuf>,
    pub phase: SubmitPhase,
}

impl CertificationForm {
    /// Validate all fields as on blur; true when the form can be submitted.
    pub fn validate_all(&mut self) -> bool {
        self.pilot_name.on_blur(FieldKind::Text, true);
        self.cert_type.on_blur(FieldKind::Text, true);
        self.issue_date.on_blur(FieldKind::Date, true);
        self.expiry_date.on_blur(FieldKind::Date, true);

        [
            &self.pilot_name,
            &self.cert_type,
            &self.issue_date,
            &self.expiry_date,
        ]
        .iter()
        .all(|f| f.validity == Validity::Valid)
    }

    /// Build the creation payload. Only call after [`Self::validate_all`].
    #[must_use]
    pub fn to_request(&self, file_path: Option<String>) -> Option<NewCertification> {
        Some(NewCertification {
            pilot_name: self.pilot_name.value.trim().to_string(),
            cert_type: self.cert_type.value.trim().to_string(),
            issue_date: parse_date(self.issue_date.value.trim())?,
            expiry_date: parse_date(self.expiry_date.value.trim())?,
            file_path,
        })
    }

    pub fn reset(&mut self) {
        self.pilot_name.reset();
        self.cert_type.reset();
        self.issue_date.reset();
        self.expiry_date.reset();
        self.file = None;
    }
}

/// Values of the contact / quote form.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: FieldState,
    pub email: FieldState,
    pub phone: FieldState,
    pub property_name: FieldState,
    pub area_hectares: FieldState,
    pub application_type: String,
    pub observations: FieldState,
    pub phase: SubmitPhase,
}

impl ContactForm {
    pub fn validate_all(&mut self) -> bool {
        self.name.on_blur(FieldKind::Text, true);
        self.email.on_blur(FieldKind::Email, true);
        self.phone.on_blur(FieldKind::Phone, true);
        self.property_name.on_blur(FieldKind::Text, true);
        self.area_hectares.on_blur(FieldKind::Text, true);
        self.observations.on_blur(FieldKind::Text, false);

        [
            &self.name,
            &self.email,
            &self.phone,
            &self.property_name,
            &self.area_hectares,
        ]
        .iter()
        .all(|f| f.validity == Validity::Valid)
    }

    #[must_use]
    pub fn to_request(&self) -> ContactRequest {
        ContactRequest {
            name: self.name.value.trim().to_string(),
            email: self.email.value.trim().to_string(),
            phone: self.phone.value.trim().to_string(),
            property_name: self.property_name.value.trim().to_string(),
            area_hectares: self.area_hectares.value.trim().to_string(),
            application_type: self.application_type.clone(),
            observations: self.observations.value.trim().to_string(),
        }
    }

    pub fn reset(&mut self) {
        self.name.reset();
        self.email.reset();
        self.phone.reset();
        self.property_name.reset();
        self.area_hectares.reset();
        self.application_type.clear();
        self.observations.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_mask_table() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("1"), "1");
        assert_eq!(format_phone("11"), "(11) ");
        assert_eq!(format_phone("119"), "(11) 9");
        assert_eq!(format_phone("11987"), "(11) 987");
        assert_eq!(format_phone("119876"), "(11) 9876");
        assert_eq!(format_phone("119876543"), "(11) 9876543");
        assert_eq!(format_phone("1134567890"), "(11) 3456-7890");
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
    }

    #[test]
    fn test_phone_mask_strips_and_truncates() {
        assert_eq!(format_phone("(11) 98765-4321"), "(11) 98765-4321");
        assert_eq!(format_phone("11 98765 4321 999"), "(11) 98765-4321");
        assert_eq!(format_phone("abc"), "");
    }

    #[test]
    fn test_email_validator() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a @b.co"));
    }

    #[test]
    fn test_phone_validator() {
        assert!(is_valid_phone("(11) 98765-4321"));
        assert!(is_valid_phone("(11) 3456-7890"));
        assert!(!is_valid_phone("11987654321"));
        assert!(!is_valid_phone("(11)98765-4321"));
        assert!(!is_valid_phone("(11) 987-4321"));
    }

    #[test]
    fn test_required_validation_trims_whitespace() {
        assert_eq!(validate("   ", FieldKind::Text, true), Validity::Invalid);
        assert_eq!(validate("   ", FieldKind::Text, false), Validity::Unset);
        assert_eq!(validate(" ok ", FieldKind::Text, true), Validity::Valid);
    }

    #[test]
    fn test_typing_clears_only_invalid_marker() {
        let mut field = FieldState {
            value: "a@b".to_string(),
            validity: Validity::Unset,
        };

        field.on_blur(FieldKind::Email, true);
        assert_eq!(field.validity, Validity::Invalid);

        field.value.push_str(".co");
        field.on_changed();
        assert_eq!(field.validity, Validity::Unset);

        field.on_blur(FieldKind::Email, true);
        assert_eq!(field.validity, Validity::Valid);

        // A valid marker is not cleared by typing.
        field.value.push('x');
        field.on_changed();
        assert_eq!(field.validity, Validity::Valid);
    }

    #[test]
    fn test_date_parsing_accepts_both_forms() {
        assert_eq!(
            parse_date("01/03/2025"),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(
            parse_date("2025-03-01"),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(parse_date("31/02/2025"), None);
    }

    #[test]
    fn test_certification_form_rejects_missing_fields() {
        let mut form = CertificationForm::default();
        form.pilot_name.value = "Maria".to_string();
        assert!(!form.validate_all());
        assert_eq!(form.cert_type.validity, Validity::Invalid);

        form.cert_type.value = "ANAC".to_string();
        form.issue_date.value = "01/01/2025".to_string();
        form.expiry_date.value = "01/01/2027".to_string();
        assert!(form.validate_all());

        let req = form.to_request(Some("/uploads/c.pdf".to_string())).unwrap();
        assert_eq!(req.file_path.as_deref(), Some("/uploads/c.pdf"));
        assert_eq!(req.issue_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_contact_form_failure_keeps_values() {
        let mut form = ContactForm::default();
        form.name.value = "João".to_string();
        form.email.value = "joao@fazenda".to_string();
        form.phone.value = "(11) 98765-4321".to_string();
        form.property_name.value = "Fazenda Boa Vista".to_string();
        form.area_hectares.value = "120".to_string();

        assert!(!form.validate_all());
        assert_eq!(form.email.validity, Validity::Invalid);
        // Entered values are untouched for correction.
        assert_eq!(form.name.value, "João");
        assert_eq!(form.area_hectares.value, "120");
    }
}
