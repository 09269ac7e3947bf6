//! Registration fields and the per-role field-set table.

use serde::{Deserialize, Serialize};

use esst_auth::Role;

/// Every input the wizard knows about, across all steps and roles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    UserType,
    FirstName,
    LastName,
    Email,
    Phone,
    BirthDate,
    Department,
    Position,
    EmployeeId,
    Specialization,
    Bio,
    StudentId,
    Program,
    Year,
    Address,
    Organization,
    Interest,
    Purpose,
    Password,
    ConfirmPassword,
    AcceptTerms,
}

impl Field {
    /// Form key (camelCase).
    pub fn key(&self) -> &'static str {
        match self {
            Field::UserType => "userType",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::BirthDate => "birthDate",
            Field::Department => "department",
            Field::Position => "position",
            Field::EmployeeId => "employeeId",
            Field::Specialization => "specialization",
            Field::Bio => "bio",
            Field::StudentId => "studentId",
            Field::Program => "program",
            Field::Year => "year",
            Field::Address => "address",
            Field::Organization => "organization",
            Field::Interest => "interest",
            Field::Purpose => "purpose",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::AcceptTerms => "acceptTerms",
        }
    }

    /// Values that must never appear in logs or debug output.
    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password | Field::ConfirmPassword)
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

/// Input widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "options")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Date,
    Textarea,
    Select(&'static [&'static str]),
}

/// One row of a role's personal-information form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: Field,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn required(field: Field, label: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            label,
            kind,
            required: true,
        }
    }

    const fn optional(field: Field, label: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            label,
            kind,
            required: false,
        }
    }
}

pub const DEPARTMENTS: &[&str] = &[
    "Informatique",
    "Sciences",
    "Technologies",
    "Mathématiques",
    "Physique",
    "Chimie",
    "Biologie",
    "Ingénierie",
];

pub const STUDY_YEARS: &[&str] = &[
    "1ère année",
    "2ème année",
    "3ème année",
    "Master 1",
    "Master 2",
    "Doctorat",
];

const FIRST_NAME: FieldSpec = FieldSpec::required(Field::FirstName, "Prénom", FieldKind::Text);
const LAST_NAME: FieldSpec = FieldSpec::required(Field::LastName, "Nom", FieldKind::Text);
const EMAIL: FieldSpec = FieldSpec::required(Field::Email, "Adresse email", FieldKind::Email);
const PHONE: FieldSpec = FieldSpec::optional(Field::Phone, "Téléphone", FieldKind::Tel);
const BIRTH_DATE: FieldSpec =
    FieldSpec::optional(Field::BirthDate, "Date de naissance", FieldKind::Date);
const DEPARTMENT: FieldSpec =
    FieldSpec::required(Field::Department, "Département", FieldKind::Select(DEPARTMENTS));

const ADMIN_FIELDS: &[FieldSpec] = &[
    FIRST_NAME,
    LAST_NAME,
    EMAIL,
    PHONE,
    BIRTH_DATE,
    DEPARTMENT,
    FieldSpec::required(Field::Position, "Poste", FieldKind::Text),
    FieldSpec::required(Field::EmployeeId, "ID Employé", FieldKind::Text),
];

const TEACHER_FIELDS: &[FieldSpec] = &[
    FIRST_NAME,
    LAST_NAME,
    EMAIL,
    PHONE,
    BIRTH_DATE,
    DEPARTMENT,
    FieldSpec::required(Field::Specialization, "Spécialisation", FieldKind::Text),
    FieldSpec::required(Field::EmployeeId, "ID Enseignant", FieldKind::Text),
    FieldSpec::optional(Field::Bio, "Biographie professionnelle", FieldKind::Textarea),
];

const STUDENT_FIELDS: &[FieldSpec] = &[
    FIRST_NAME,
    LAST_NAME,
    EMAIL,
    PHONE,
    BIRTH_DATE,
    FieldSpec::required(Field::StudentId, "Numéro étudiant", FieldKind::Text),
    FieldSpec::required(Field::Program, "Programme d'études", FieldKind::Text),
    FieldSpec::required(Field::Year, "Année d'études", FieldKind::Select(STUDY_YEARS)),
    FieldSpec::optional(Field::Address, "Adresse", FieldKind::Text),
];

const VISITOR_FIELDS: &[FieldSpec] = &[
    FIRST_NAME,
    LAST_NAME,
    EMAIL,
    PHONE,
    BIRTH_DATE,
    FieldSpec::optional(Field::Organization, "Organisation", FieldKind::Text),
    FieldSpec::required(Field::Interest, "Domaine d'intérêt", FieldKind::Select(DEPARTMENTS)),
    FieldSpec::required(Field::Purpose, "Objectif de visite", FieldKind::Textarea),
];

/// Fields shown before a role is chosen.
const COMMON_FIELDS: &[FieldSpec] = &[FIRST_NAME, LAST_NAME, EMAIL, PHONE, BIRTH_DATE];

static FIELD_SETS: [&[FieldSpec]; 4] = [ADMIN_FIELDS, TEACHER_FIELDS, STUDENT_FIELDS, VISITOR_FIELDS];

/// Personal-information form for a role (`None`: common fields only).
pub fn fields_for(role: Option<Role>) -> &'static [FieldSpec] {
    match role {
        Some(role) => FIELD_SETS[role.index()],
        None => COMMON_FIELDS,
    }
}

/// Required personal-information fields for a role, in form order.
pub fn required_fields(role: Option<Role>) -> impl Iterator<Item = Field> {
    fields_for(role)
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| spec.field)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn required(role: Role) -> BTreeSet<Field> {
        required_fields(Some(role)).collect()
    }

    #[test]
    fn student_requires_identity_and_enrolment() {
        let expected: BTreeSet<Field> = [
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::StudentId,
            Field::Program,
            Field::Year,
        ]
        .into_iter()
        .collect();
        assert_eq!(required(Role::Student), expected);
    }

    #[test]
    fn teacher_requires_department_specialization_and_employee_id() {
        let set = required(Role::Teacher);
        assert!(set.contains(&Field::Department));
        assert!(set.contains(&Field::Specialization));
        assert!(set.contains(&Field::EmployeeId));
        assert!(!set.contains(&Field::Bio));
    }

    #[test]
    fn admin_and_visitor_sets() {
        assert!(required(Role::Admin).contains(&Field::Position));
        let visitor = required(Role::Visitor);
        assert!(visitor.contains(&Field::Interest));
        assert!(visitor.contains(&Field::Purpose));
        assert!(!visitor.contains(&Field::Organization));
    }

    #[test]
    fn every_set_starts_with_common_fields() {
        for role in Role::ALL {
            assert_eq!(&fields_for(Some(role))[..COMMON_FIELDS.len()], COMMON_FIELDS);
        }
        let none: Vec<Field> = required_fields(None).collect();
        assert_eq!(none, vec![Field::FirstName, Field::LastName, Field::Email]);
    }

    #[test]
    fn keys_match_serde_names() {
        for field in [Field::FirstName, Field::ConfirmPassword, Field::StudentId] {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }
}
