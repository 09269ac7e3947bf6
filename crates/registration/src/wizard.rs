//! The three-step registration state machine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use esst_auth::Role;

use crate::draft::RegistrationDraft;
use crate::field::{Field, fields_for};
use crate::gateway::{GatewayError, RegistrationGateway};
use crate::policy::{PasswordRequirement, PasswordStrength};
use crate::validation::{ValidationErrors, validate_step};

pub const SUCCESS_MESSAGE: &str = "Inscription réussie ! Vous pouvez maintenant vous connecter.";
pub const SUBMIT_FAILED_MESSAGE: &str = "Une erreur est survenue lors de l'inscription";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    UserTypeSelection,
    PersonalInfo,
    Security,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::UserTypeSelection, Step::PersonalInfo, Step::Security];

    /// 1-based position.
    pub fn number(&self) -> u8 {
        match self {
            Step::UserTypeSelection => 1,
            Step::PersonalInfo => 2,
            Step::Security => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::UserTypeSelection => "Type de compte",
            Step::PersonalInfo => "Informations personnelles",
            Step::Security => "Sécurité",
        }
    }

    pub fn next(&self) -> Option<Step> {
        match self {
            Step::UserTypeSelection => Some(Step::PersonalInfo),
            Step::PersonalInfo => Some(Step::Security),
            Step::Security => None,
        }
    }

    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::UserTypeSelection => None,
            Step::PersonalInfo => Some(Step::UserTypeSelection),
            Step::Security => Some(Step::PersonalInfo),
        }
    }
}

impl core::fmt::Display for Step {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// What the caller does once the wizard is done: show `message` on the
/// login page at `redirect_to`, prefilled with `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub email: String,
    pub message: &'static str,
    pub redirect_to: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Editing(Step),
    Submitted(Submission),
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("step {step} has {} invalid field(s): {errors}", .errors.len())]
    Invalid { step: Step, errors: ValidationErrors },

    #[error("submission is only possible from the last step (currently at {0})")]
    NotAtFinalStep(Step),

    #[error("registration already submitted")]
    AlreadySubmitted,

    #[error("Une erreur est survenue lors de l'inscription")]
    Gateway(#[source] GatewayError),
}

/// The finished record handed to a [`RegistrationGateway`].
///
/// Only the selected role's fields are carried; the password is never
/// serialized and is redacted from debug output.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub details: BTreeMap<Field, String>,
    pub accept_newsletter: bool,
    pub submitted_at: DateTime<Utc>,
}

impl Registration {
    fn assemble(role: Role, draft: &RegistrationDraft) -> Self {
        let details = fields_for(Some(role))
            .iter()
            .map(|spec| spec.field)
            .filter(|field| !matches!(field, Field::FirstName | Field::LastName | Field::Email))
            .filter(|field| draft.is_filled(*field))
            .map(|field| (field, draft.value(field).trim().to_string()))
            .collect();

        Self {
            role,
            first_name: draft.value(Field::FirstName).trim().to_string(),
            last_name: draft.value(Field::LastName).trim().to_string(),
            email: draft.value(Field::Email).trim().to_string(),
            password: draft.value(Field::Password).to_string(),
            details,
            accept_newsletter: draft.accept_newsletter(),
            submitted_at: Utc::now(),
        }
    }
}

impl core::fmt::Debug for Registration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration")
            .field("role", &self.role)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("details", &self.details)
            .field("accept_newsletter", &self.accept_newsletter)
            .field("submitted_at", &self.submitted_at)
            .finish()
    }
}

/// Registration wizard.
///
/// Holds the draft, the current step and the errors from the last failed
/// validation. Advancing validates the current step; going back never does.
/// Once submitted, the wizard is frozen.
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    draft: RegistrationDraft,
    state: WizardState,
    errors: ValidationErrors,
    banner: Option<&'static str>,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            draft: RegistrationDraft::new(),
            state: WizardState::Editing(Step::UserTypeSelection),
            errors: ValidationErrors::new(),
            banner: None,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Current step; `None` once submitted.
    pub fn step(&self) -> Option<Step> {
        match self.state {
            WizardState::Editing(step) => Some(step),
            WizardState::Submitted(_) => None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.state, WizardState::Submitted(_))
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Errors from the last failed validation, minus fields edited since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Form-level error from the last failed submission.
    pub fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    /// Progress through the steps, in percent.
    pub fn progress(&self) -> u8 {
        match self.state {
            WizardState::Editing(step) => {
                (u16::from(step.number()) * 100 / Step::ALL.len() as u16) as u8
            }
            WizardState::Submitted(_) => 100,
        }
    }

    pub fn select_role(&mut self, role: Role) {
        if self.frozen("select_role") {
            return;
        }
        self.draft.set_role(role);
        self.errors.remove(Field::UserType);
    }

    /// Set any field by key. `UserType` expects a role name (unknown names
    /// are ignored); `AcceptTerms` is checked by `true` or `on`.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::UserType => match value.parse::<Role>() {
                Ok(role) => self.select_role(role),
                Err(err) => tracing::warn!("ignoring role selection: {err}"),
            },
            Field::AcceptTerms => self.set_accept_terms(matches!(value.as_str(), "true" | "on")),
            _ => {
                if self.frozen("set_field") {
                    return;
                }
                self.draft.set(field, value);
                self.errors.remove(field);
            }
        }
    }

    pub fn set_accept_terms(&mut self, accepted: bool) {
        if self.frozen("set_accept_terms") {
            return;
        }
        self.draft.set_accept_terms(accepted);
        self.errors.remove(Field::AcceptTerms);
    }

    pub fn set_accept_newsletter(&mut self, accepted: bool) {
        if self.frozen("set_accept_newsletter") {
            return;
        }
        self.draft.set_accept_newsletter(accepted);
    }

    /// Validate one step against the current draft without moving.
    pub fn validate_step(&self, step: Step) -> ValidationErrors {
        validate_step(&self.draft, step)
    }

    /// Validate the current step and advance on success (stays on the last
    /// step).
    pub fn next(&mut self) -> Result<Step, WizardError> {
        let step = self.editing_step()?;
        self.check(step)?;

        let next = step.next().unwrap_or(step);
        if next != step {
            tracing::debug!(from = %step, to = %next, "registration step advanced");
        }
        self.state = WizardState::Editing(next);
        Ok(next)
    }

    /// Go back one step (stays on the first step). Never validates.
    pub fn previous(&mut self) -> Result<Step, WizardError> {
        let step = self.editing_step()?;
        let previous = step.previous().unwrap_or(step);
        self.errors = ValidationErrors::new();
        self.state = WizardState::Editing(previous);
        Ok(previous)
    }

    /// Each policy rule with whether the current password meets it.
    pub fn password_checklist(&self) -> Vec<(PasswordRequirement, bool)> {
        let password = self.draft.value(Field::Password);
        PasswordRequirement::ALL
            .into_iter()
            .map(|req| (req, req.is_met(password)))
            .collect()
    }

    /// Strength of the current password; `None` while it is empty.
    pub fn password_strength(&self) -> Option<PasswordStrength> {
        let password = self.draft.value(Field::Password);
        (!password.is_empty()).then(|| PasswordStrength::of(password))
    }

    /// Submit from the last step.
    ///
    /// All three steps are re-validated in order; the first failing step
    /// becomes current again. A gateway failure leaves the wizard on the last
    /// step with the draft intact.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<Submission, WizardError>
    where
        G: RegistrationGateway + ?Sized,
    {
        let step = self.editing_step()?;
        if step != Step::Security {
            return Err(WizardError::NotAtFinalStep(step));
        }

        for step in Step::ALL {
            if let Err(err) = self.check(step) {
                self.state = WizardState::Editing(step);
                return Err(err);
            }
        }

        let Some(role) = self.draft.role() else {
            let step = Step::UserTypeSelection;
            self.state = WizardState::Editing(step);
            self.errors = validate_step(&self.draft, step);
            return Err(WizardError::Invalid {
                step,
                errors: self.errors.clone(),
            });
        };
        let registration = Registration::assemble(role, &self.draft);

        self.banner = None;
        if let Err(err) = gateway.register(&registration).await {
            tracing::error!(email = %registration.email, "registration failed: {err}");
            self.banner = Some(SUBMIT_FAILED_MESSAGE);
            return Err(WizardError::Gateway(err));
        }

        let submission = Submission {
            email: registration.email,
            message: SUCCESS_MESSAGE,
            redirect_to: esst_auth::routes::LOGIN_PATH,
        };
        tracing::info!(role = %role, "registration submitted");
        self.state = WizardState::Submitted(submission.clone());
        Ok(submission)
    }

    fn editing_step(&self) -> Result<Step, WizardError> {
        self.step().ok_or(WizardError::AlreadySubmitted)
    }

    fn check(&mut self, step: Step) -> Result<(), WizardError> {
        let errors = validate_step(&self.draft, step);
        if errors.is_empty() {
            self.errors = ValidationErrors::new();
            return Ok(());
        }

        tracing::debug!(step = %step, fields = errors.len(), "registration step invalid");
        self.errors = errors.clone();
        Err(WizardError::Invalid { step, errors })
    }

    fn frozen(&self, op: &str) -> bool {
        let frozen = self.is_submitted();
        if frozen {
            tracing::warn!(op, "registration already submitted; edit ignored");
        }
        frozen
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use proptest::prelude::*;

    use super::*;
    use crate::gateway::{DEFAULT_SUBMIT_DELAY, SimulatedGateway};
    use crate::validation::{MSG_REQUIRED, MSG_SELECT_ROLE};

    fn instant() -> SimulatedGateway {
        SimulatedGateway::new(Duration::ZERO)
    }

    /// Gateway that always fails and counts calls.
    #[derive(Default)]
    struct DownGateway {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RegistrationGateway for DownGateway {
        async fn register(&self, _registration: &Registration) -> Result<(), GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::Unavailable)
        }
    }

    fn fill_student(wizard: &mut RegistrationWizard) {
        wizard.select_role(Role::Student);
        wizard.set_field(Field::FirstName, "Sophie");
        wizard.set_field(Field::LastName, "Martin");
        wizard.set_field(Field::Email, "sophie.martin@student.esst.edu");
        wizard.set_field(Field::StudentId, "E2024001");
        wizard.set_field(Field::Program, "Génie logiciel");
        wizard.set_field(Field::Year, "2ème année");
    }

    fn fill_security(wizard: &mut RegistrationWizard) {
        wizard.set_field(Field::Password, "Abc123!@");
        wizard.set_field(Field::ConfirmPassword, "Abc123!@");
        wizard.set_accept_terms(true);
    }

    fn at_security() -> RegistrationWizard {
        let mut wizard = RegistrationWizard::new();
        fill_student(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();
        fill_security(&mut wizard);
        wizard
    }

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
            .block_on(fut)
    }

    #[test]
    fn submit_without_role_returns_to_role_selection() {
        let mut wizard = RegistrationWizard::new();
        fill_security(&mut wizard);
        wizard.state = WizardState::Editing(Step::Security);

        let (step, errors) = match block_on(wizard.submit(&SimulatedGateway::new(Duration::ZERO))) {
            Err(WizardError::Invalid { step, errors }) => (step, errors),
            other => panic!("expected a validation failure, got {other:?}"),
        };
        assert_eq!(step, Step::UserTypeSelection);
        assert_eq!(errors.get(Field::UserType), Some(MSG_SELECT_ROLE));
        assert_eq!(wizard.step(), Some(Step::UserTypeSelection));
        assert!(!wizard.is_submitted());
    }

    #[test]
    fn starts_at_role_selection() {
        let wizard = RegistrationWizard::new();
        assert_eq!(wizard.step(), Some(Step::UserTypeSelection));
        assert_eq!(wizard.progress(), 33);
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn cannot_advance_without_role() {
        let mut wizard = RegistrationWizard::new();
        let err = wizard.next().unwrap_err();
        assert!(matches!(err, WizardError::Invalid { step: Step::UserTypeSelection, .. }));
        assert_eq!(wizard.step(), Some(Step::UserTypeSelection));
        assert!(wizard.errors().contains(Field::UserType));

        wizard.set_field(Field::UserType, "student");
        assert!(wizard.errors().is_empty());
        assert_eq!(wizard.next().unwrap(), Step::PersonalInfo);
    }

    #[test]
    fn empty_year_blocks_advance() {
        let mut wizard = RegistrationWizard::new();
        fill_student(&mut wizard);
        wizard.set_field(Field::Year, "");
        wizard.next().unwrap();

        let Err(WizardError::Invalid { step, errors }) = wizard.next() else {
            panic!("expected a validation error");
        };
        assert_eq!(step, Step::PersonalInfo);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Year), Some(MSG_REQUIRED));
        assert_eq!(wizard.step(), Some(Step::PersonalInfo));
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut wizard = RegistrationWizard::new();
        wizard.select_role(Role::Student);
        wizard.next().unwrap();
        assert!(wizard.next().is_err());
        assert!(wizard.errors().contains(Field::Program));

        wizard.set_field(Field::Program, "Génie logiciel");
        assert!(!wizard.errors().contains(Field::Program));
        assert!(wizard.errors().contains(Field::Year));
    }

    #[test]
    fn previous_never_validates_and_stops_at_first_step() {
        let mut wizard = at_security();
        wizard.set_field(Field::FirstName, "");
        assert_eq!(wizard.previous().unwrap(), Step::PersonalInfo);
        assert_eq!(wizard.previous().unwrap(), Step::UserTypeSelection);
        assert_eq!(wizard.previous().unwrap(), Step::UserTypeSelection);
    }

    #[test]
    fn next_on_last_step_validates_and_stays() {
        let mut wizard = at_security();
        assert_eq!(wizard.next().unwrap(), Step::Security);
        assert_eq!(wizard.progress(), 100);

        wizard.set_field(Field::ConfirmPassword, "different");
        assert!(matches!(
            wizard.next(),
            Err(WizardError::Invalid { step: Step::Security, .. })
        ));
        assert_eq!(wizard.step(), Some(Step::Security));
    }

    #[test]
    fn role_change_keeps_values_but_switches_requirements() {
        let mut wizard = RegistrationWizard::new();
        fill_student(&mut wizard);
        wizard.select_role(Role::Teacher);

        let errors = wizard.validate_step(Step::PersonalInfo);
        assert!(errors.contains(Field::Department));
        assert!(!errors.contains(Field::StudentId));
        assert_eq!(wizard.draft().value(Field::StudentId), "E2024001");
    }

    #[test]
    fn checklist_and_strength_track_the_password() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.password_strength(), None);

        wizard.set_field(Field::Password, "abc12345");
        let unmet: Vec<PasswordRequirement> = wizard
            .password_checklist()
            .into_iter()
            .filter(|(_, met)| !met)
            .map(|(req, _)| req)
            .collect();
        assert_eq!(unmet, vec![PasswordRequirement::Uppercase, PasswordRequirement::Symbol]);
        assert_eq!(wizard.password_strength(), Some(PasswordStrength::Medium));
    }

    #[test]
    fn submit_requires_last_step() {
        let mut wizard = RegistrationWizard::new();
        fill_student(&mut wizard);
        let err = block_on(wizard.submit(&instant())).unwrap_err();
        assert!(matches!(err, WizardError::NotAtFinalStep(Step::UserTypeSelection)));
    }

    #[test]
    fn submit_sends_back_to_first_failing_step() {
        let mut wizard = at_security();
        wizard.set_field(Field::Email, "");

        let err = block_on(wizard.submit(&instant())).unwrap_err();
        assert!(matches!(err, WizardError::Invalid { step: Step::PersonalInfo, .. }));
        assert_eq!(wizard.step(), Some(Step::PersonalInfo));
        assert!(!wizard.is_submitted());
    }

    #[test]
    fn gateway_failure_keeps_the_draft() {
        let mut wizard = at_security();
        let gateway = DownGateway::default();

        let err = block_on(wizard.submit(&gateway)).unwrap_err();
        assert_eq!(err.to_string(), SUBMIT_FAILED_MESSAGE);
        assert_eq!(wizard.banner(), Some(SUBMIT_FAILED_MESSAGE));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(wizard.step(), Some(Step::Security));
        assert_eq!(wizard.draft().value(Field::Password), "Abc123!@");
    }

    #[test]
    fn submitted_wizard_is_frozen() {
        let mut wizard = at_security();
        block_on(wizard.submit(&instant())).unwrap();

        wizard.set_field(Field::Email, "other@esst.edu");
        wizard.select_role(Role::Admin);
        assert_eq!(wizard.draft().value(Field::Email), "sophie.martin@student.esst.edu");
        assert_eq!(wizard.draft().role(), Some(Role::Student));
        assert!(matches!(wizard.next(), Err(WizardError::AlreadySubmitted)));
        assert!(matches!(
            block_on(wizard.submit(&instant())),
            Err(WizardError::AlreadySubmitted)
        ));
    }

    #[test]
    fn registration_keeps_only_role_fields_and_hides_password() {
        let mut wizard = at_security();
        wizard.set_field(Field::Specialization, "Réseaux");
        wizard.set_field(Field::Phone, "0102030405");
        wizard.set_accept_newsletter(true);

        let draft = wizard.draft().clone();
        let registration = Registration::assemble(Role::Student, &draft);
        assert!(!registration.details.contains_key(&Field::Specialization));
        assert_eq!(registration.details.get(&Field::Phone).unwrap(), "0102030405");
        assert!(registration.accept_newsletter);

        let json = serde_json::to_value(&registration).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["details"]["studentId"], "E2024001");
        assert!(!format!("{registration:?}").contains("Abc123!@"));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_submit_waits_then_redirects_to_login() {
        let mut wizard = at_security();
        let start = tokio::time::Instant::now();

        let submission = wizard.submit(&SimulatedGateway::default()).await.unwrap();

        assert!(start.elapsed() >= DEFAULT_SUBMIT_DELAY);
        assert_eq!(submission.email, "sophie.martin@student.esst.edu");
        assert_eq!(submission.message, SUCCESS_MESSAGE);
        assert_eq!(submission.redirect_to, "/login");
        assert_eq!(wizard.state(), &WizardState::Submitted(submission));
        assert_eq!(wizard.step(), None);
    }

    proptest! {
        /// Property: the wizard reaches `Submitted` only when every step
        /// validates against the final draft.
        #[test]
        fn submitted_implies_all_steps_valid(
            first in "[A-Za-z ]{0,6}",
            email in prop_oneof![Just("a@b.fr".to_string()), "[a-z@.]{0,8}"],
            year in prop_oneof![Just(String::new()), Just("Master 1".to_string())],
            password in prop_oneof![Just("Abc123!@".to_string()), "[ -~]{0,10}"],
            terms in any::<bool>(),
        ) {
            let mut wizard = RegistrationWizard::new();
            fill_student(&mut wizard);
            wizard.set_field(Field::FirstName, first);
            wizard.set_field(Field::Email, email);
            wizard.set_field(Field::Year, year);
            wizard.set_field(Field::Password, password.clone());
            wizard.set_field(Field::ConfirmPassword, password);
            wizard.set_accept_terms(terms);

            let _ = wizard.next();
            let _ = wizard.next();
            let result = block_on(wizard.submit(&instant()));

            let all_valid = Step::ALL
                .into_iter()
                .all(|step| wizard.validate_step(step).is_empty());
            prop_assert_eq!(result.is_ok(), all_valid);
            prop_assert_eq!(wizard.is_submitted(), all_valid);
        }
    }
}
