//! Inline field validation for the data-entry screens.
//!
//! Validation failures are local to a screen: they block the forward
//! transition and are shown next to the offending field, nothing more.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Gender, PersonalInfo};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern compiles"));

/// Oldest age the age picker offers.
pub const MAX_AGE: u32 = 120;

/// Maximum words accepted in the free-text "other" complaint.
pub const MAX_OTHER_COMPLAINT_WORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    Phone,
    NationalityId,
    Consent,
    Agree,
    Age,
    Gender,
    OtherComplaint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Issue {
    Required,
    InvalidFormat,
    TooManyWords { max: usize },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Required => f.write_str("is required"),
            Issue::InvalidFormat => f.write_str("is not valid"),
            Issue::TooManyWords { max } => write!(f, "must be at most {max} words"),
        }
    }
}

/// Field-level validation failures, one issue per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: BTreeMap<Field, Issue>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<Issue> {
        self.issues.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Issue)> + '_ {
        self.issues.iter().map(|(f, i)| (*f, *i))
    }

    /// Later issues for the same field replace earlier ones.
    pub fn insert(&mut self, field: Field, issue: Issue) {
        self.issues.insert(field, issue);
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, issue) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field:?} {issue}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

/// Validate the personal info form. Phone is optional but must be well
/// formed when present; consent and agreement are mandatory.
pub fn validate_personal_info(info: &PersonalInfo) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if info.full_name.trim().is_empty() {
        errors.insert(Field::FullName, Issue::Required);
    }
    if info.email.is_empty() {
        errors.insert(Field::Email, Issue::Required);
    } else if !is_valid_email(&info.email) {
        errors.insert(Field::Email, Issue::InvalidFormat);
    }
    if info.nationality_id.is_none() {
        errors.insert(Field::NationalityId, Issue::Required);
    }
    if !info.phone.is_empty() && !is_valid_phone(&info.phone) {
        errors.insert(Field::Phone, Issue::InvalidFormat);
    }
    if !info.consent {
        errors.insert(Field::Consent, Issue::Required);
    }
    if !info.agree {
        errors.insert(Field::Agree, Issue::Required);
    }

    errors.into_result()
}

/// Validate the age/gender screen. An age of zero means "not given" and is
/// accepted; the gender must be chosen.
pub fn validate_age_gender(age: u32, gender: Option<Gender>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if age > MAX_AGE {
        errors.insert(Field::Age, Issue::InvalidFormat);
    }
    if gender.is_none() {
        errors.insert(Field::Gender, Issue::Required);
    }
    errors.into_result()
}

/// Validate free-text "other" complaint input.
pub fn validate_other_complaint(text: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let words = text.split_whitespace().count();
    if words == 0 {
        errors.insert(Field::OtherComplaint, Issue::Required);
    } else if words > MAX_OTHER_COMPLAINT_WORDS {
        errors.insert(
            Field::OtherComplaint,
            Issue::TooManyWords {
                max: MAX_OTHER_COMPLAINT_WORDS,
            },
        );
    }
    errors.into_result()
}
