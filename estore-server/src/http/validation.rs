//! Request payload validation
//!
//! Rules per field, reported together so a client can fix every problem in
//! one round trip:
//! - `required`: value is blank
//! - `len=2`: state must be a two-letter code
//! - `positive`: ids must be greater than zero

use std::collections::BTreeMap;
use std::fmt;

use estore_core::{Profile, StoreData};

/// Field name mapped to the rule it broke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, &'static str>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field error, for path and query parameters.
    pub fn single(field: &'static str, rule: &'static str) -> Self {
        let mut errors = Self::new();
        errors.add(field, rule);
        errors
    }

    pub fn add(&mut self, field: &'static str, rule: &'static str) {
        self.fields.entry(field).or_insert(rule);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<&'static str, &'static str> {
        &self.fields
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid fields: ")?;
        for (i, (field, rule)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} ({})", field, rule)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a decoded payload before it reaches the core.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn check_profile(profile: &Profile, errors: &mut ValidationErrors) {
    let required = [
        ("number", &profile.number),
        ("name", &profile.name),
        ("address", &profile.address),
        ("address_number", &profile.address_number),
        ("city", &profile.city),
        ("state", &profile.state),
        ("zip_code", &profile.zip_code),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.add(field, "required");
        }
    }

    if !profile.state.trim().is_empty() && profile.state.chars().count() != 2 {
        errors.add("state", "len=2");
    }
}

impl Validate for Profile {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_profile(self, &mut errors);
        errors.into_result()
    }
}

impl Validate for StoreData {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_profile(&self.profile, &mut errors);
        if self.establishment_id == 0 {
            errors.add("establishment_id", "required");
        } else if self.establishment_id < 0 {
            errors.add("establishment_id", "positive");
        }
        errors.into_result()
    }
}
