//! Multi-step registration wizard.
//!
//! Three ordered steps (role, personal information, security), each validated
//! before the next can be entered, then an asynchronous submission through a
//! [`RegistrationGateway`]. Validation is pure and deterministic; the gateway
//! is the only async seam.

pub mod draft;
pub mod field;
pub mod gateway;
pub mod policy;
pub mod validation;
pub mod wizard;

pub use draft::RegistrationDraft;
pub use field::{Field, FieldKind, FieldSpec, fields_for, required_fields};
pub use gateway::{GatewayError, RegistrationGateway, SimulatedGateway};
pub use policy::{PasswordRequirement, PasswordStrength, is_valid_email, missing_requirements};
pub use validation::{ValidationErrors, validate_step};
pub use wizard::{Registration, RegistrationWizard, Step, Submission, WizardError, WizardState};
