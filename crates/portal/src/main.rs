//! Headless walkthrough of the portal: register, sign in, browse, sign out.

use anyhow::Context;
use chrono::{Timelike, Utc};

use esst_auth::{FileStorage, FixedDirectory, Role, Session};
use esst_portal::{Navigation, PortalConfig, PortalContext};
use esst_registration::{Field, RegistrationWizard, SimulatedGateway};

const DEMO_EMAIL: &str = "sophie.martin@student.esst.edu";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    esst_observability::init();

    let config = PortalConfig::from_env().context("invalid portal configuration")?;
    tracing::info!(
        storage_dir = %config.storage_dir.display(),
        submit_delay_ms = u64::try_from(config.submit_delay.as_millis()).unwrap_or(u64::MAX),
        "portal starting"
    );

    let storage = FileStorage::new(config.storage_dir.clone());
    let session = Session::init_with_password(
        FixedDirectory::seeded(),
        storage,
        config.demo_password.clone(),
    );
    let mut ctx = PortalContext::seeded(session, Utc::now());

    // A returning user may already be signed in from a previous run; the
    // walkthrough starts anonymous.
    if let Some(user) = ctx.current_user() {
        tracing::info!(
            name = %user.full_name(),
            role = %user.role,
            "restored session from a previous run"
        );
        ctx.logout();
    }

    register(&config).await?;

    for path in ["/", "/messaging", "/admin/cms"] {
        log_navigation(path, &ctx.navigate(path));
    }

    let user = ctx
        .login(DEMO_EMAIL, &config.demo_password)
        .context("demo login failed")?;
    tracing::info!(name = %user.full_name(), role = %user.role, "signed in as demo user");

    for path in ["/dashboard", "/student/courses", "/admin/cms", "/nowhere"] {
        log_navigation(path, &ctx.navigate(path));
    }

    let dashboard = ctx.dashboard(Utc::now().hour())?;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    ctx.logout();
    tracing::info!("portal walkthrough finished");
    Ok(())
}

async fn register(config: &PortalConfig) -> anyhow::Result<()> {
    let mut wizard = RegistrationWizard::new();

    wizard.select_role(Role::Visitor);
    wizard.next()?;

    for (field, value) in [
        (Field::FirstName, "Camille"),
        (Field::LastName, "Roux"),
        (Field::Email, "camille.roux@example.fr"),
        (Field::Interest, "Informatique"),
        (Field::Purpose, "Découvrir les formations en IA"),
    ] {
        wizard.set_field(field, value);
    }
    wizard.next()?;

    wizard.set_field(Field::Password, "Camille2025!");
    wizard.set_field(Field::ConfirmPassword, "Camille2025!");
    wizard.set_accept_terms(true);
    if let Some(strength) = wizard.password_strength() {
        tracing::info!(strength = strength.label(), "password strength");
    }

    let gateway = SimulatedGateway::new(config.submit_delay);
    let submission = wizard.submit(&gateway).await?;
    tracing::info!(
        email = %submission.email,
        redirect = submission.redirect_to,
        "{}",
        submission.message
    );
    Ok(())
}

fn log_navigation(path: &str, nav: &Navigation) {
    match nav {
        Navigation::Render(route) => tracing::info!(path, title = route.title, "render"),
        Navigation::Redirect { to, reason } => {
            tracing::info!(path, redirect = *to, "redirect: {reason}")
        }
    }
}
