//! Per-step validation. Pure: the same draft always yields the same errors.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::draft::RegistrationDraft;
use crate::field::{Field, required_fields};
use crate::policy::{is_valid_email, missing_requirements};
use crate::wizard::Step;

pub const MSG_SELECT_ROLE: &str = "Veuillez sélectionner un type de compte";
pub const MSG_REQUIRED: &str = "Ce champ est obligatoire";
pub const MSG_INVALID_EMAIL: &str = "Adresse email invalide";
pub const MSG_PASSWORD_REQUIRED: &str = "Le mot de passe est obligatoire";
pub const MSG_PASSWORD_PREFIX: &str = "Le mot de passe doit contenir : ";
pub const MSG_CONFIRM_REQUIRED: &str = "Veuillez confirmer votre mot de passe";
pub const MSG_PASSWORD_MISMATCH: &str = "Les mots de passe ne correspondent pas";
pub const MSG_ACCEPT_TERMS: &str = "Vous devez accepter les conditions d'utilisation";

/// Field to message mapping. Empty means the step passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub(crate) fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (field, msg) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validate one step of the draft.
pub fn validate_step(draft: &RegistrationDraft, step: Step) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    match step {
        Step::UserTypeSelection => {
            if draft.role().is_none() {
                errors.insert(Field::UserType, MSG_SELECT_ROLE);
            }
        }
        Step::PersonalInfo => validate_personal_info(draft, &mut errors),
        Step::Security => validate_security(draft, &mut errors),
    }
    errors
}

fn validate_personal_info(draft: &RegistrationDraft, errors: &mut ValidationErrors) {
    for field in required_fields(draft.role()) {
        if !draft.is_filled(field) {
            errors.insert(field, MSG_REQUIRED);
        }
    }

    // The pattern runs on the raw value; surrounding spaces are invalid.
    let email = draft.value(Field::Email);
    if draft.is_filled(Field::Email) && !is_valid_email(email) {
        errors.insert(Field::Email, MSG_INVALID_EMAIL);
    }
}

fn validate_security(draft: &RegistrationDraft, errors: &mut ValidationErrors) {
    let password = draft.value(Field::Password);
    if password.is_empty() {
        errors.insert(Field::Password, MSG_PASSWORD_REQUIRED);
    } else {
        let missing = missing_requirements(password);
        if !missing.is_empty() {
            let phrases: Vec<&str> = missing.iter().map(|req| req.phrase()).collect();
            errors.insert(
                Field::Password,
                format!("{MSG_PASSWORD_PREFIX}{}", phrases.join(", ")),
            );
        }
    }

    let confirm = draft.value(Field::ConfirmPassword);
    if confirm.is_empty() {
        errors.insert(Field::ConfirmPassword, MSG_CONFIRM_REQUIRED);
    } else if confirm != password {
        errors.insert(Field::ConfirmPassword, MSG_PASSWORD_MISMATCH);
    }

    if !draft.accept_terms() {
        errors.insert(Field::AcceptTerms, MSG_ACCEPT_TERMS);
    }
}
