use std::collections::BTreeMap;

use esst_auth::Role;

use crate::field::Field;

/// In-progress registration record.
///
/// Values are kept even when the role changes; only the fields of the role
/// selected at submission time end up in the final record.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    role: Option<Role>,
    values: BTreeMap<Field, String>,
    accept_terms: bool,
    accept_newsletter: bool,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub(crate) fn set_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    /// Current value of a text field (empty when unset).
    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Whether a field holds a non-blank value.
    pub fn is_filled(&self, field: Field) -> bool {
        !self.value(field).trim().is_empty()
    }

    pub(crate) fn set(&mut self, field: Field, value: String) {
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value);
        }
    }

    pub fn accept_terms(&self) -> bool {
        self.accept_terms
    }

    pub(crate) fn set_accept_terms(&mut self, accepted: bool) {
        self.accept_terms = accepted;
    }

    pub fn accept_newsletter(&self) -> bool {
        self.accept_newsletter
    }

    pub(crate) fn set_accept_newsletter(&mut self, accepted: bool) {
        self.accept_newsletter = accepted;
    }
}

impl core::fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let values: BTreeMap<Field, &str> = self
            .values
            .iter()
            .map(|(field, value)| {
                let shown = if field.is_secret() { "<redacted>" } else { value.as_str() };
                (*field, shown)
            })
            .collect();

        f.debug_struct("RegistrationDraft")
            .field("role", &self.role)
            .field("values", &values)
            .field("accept_terms", &self.accept_terms)
            .field("accept_newsletter", &self.accept_newsletter)
            .finish()
    }
}
