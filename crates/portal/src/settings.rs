//! Site-wide settings edited from the admin console.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use esst_auth::User;
use esst_core::{DomainError, DomainResult};
use esst_registration::is_valid_email;

use crate::cms::ensure_admin;

/// Simulated persistence round-trip for a settings save.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsTab {
    General,
    Contact,
    Appearance,
    Seo,
    Maintenance,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 5] = [
        SettingsTab::General,
        SettingsTab::Contact,
        SettingsTab::Appearance,
        SettingsTab::Seo,
        SettingsTab::Maintenance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsTab::General => "Général",
            SettingsTab::Contact => "Contact",
            SettingsTab::Appearance => "Apparence",
            SettingsTab::Seo => "SEO",
            SettingsTab::Maintenance => "Maintenance",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    pub site_name: String,
    pub site_description: String,
    pub site_url: String,
    pub admin_email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSettings {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub logo: String,
    pub favicon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSettings {
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub google_analytics: String,
    pub facebook_pixel: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSettings {
    pub enabled: bool,
    pub message: String,
}

/// The whole settings record, one group per tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub general: GeneralSettings,
    pub contact: ContactSettings,
    pub appearance: AppearanceSettings,
    pub seo: SeoSettings,
    pub maintenance: MaintenanceSettings,
}

impl SiteSettings {
    /// Check every group; the error names the first offending field.
    pub fn validate(&self) -> DomainResult<()> {
        if self.general.site_name.trim().is_empty() {
            return Err(DomainError::validation("general.siteName cannot be empty"));
        }
        ensure_email("general.adminEmail", &self.general.admin_email)?;
        if !self.contact.email.is_empty() {
            ensure_email("contact.email", &self.contact.email)?;
        }

        for (field, value) in [
            ("appearance.primaryColor", &self.appearance.primary_color),
            ("appearance.secondaryColor", &self.appearance.secondary_color),
            ("appearance.accentColor", &self.appearance.accent_color),
        ] {
            if !is_hex_color(value) {
                return Err(DomainError::validation(format!(
                    "{field} must be a #RRGGBB color, got '{value}'"
                )));
            }
        }

        if self.maintenance.enabled && self.maintenance.message.trim().is_empty() {
            return Err(DomainError::validation(
                "maintenance.message is required while maintenance is on",
            ));
        }
        Ok(())
    }
}

fn ensure_email(field: &str, value: &str) -> DomainResult<()> {
    if !is_valid_email(value) {
        return Err(DomainError::validation(format!("{field} is not a valid email")));
    }
    Ok(())
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Current settings plus when they were last saved.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    current: SiteSettings,
    saved_at: Option<DateTime<Utc>>,
    delay: Duration,
}

impl SettingsStore {
    pub fn new(settings: SiteSettings, delay: Duration) -> Self {
        Self {
            current: settings,
            saved_at: None,
            delay,
        }
    }

    pub fn current(&self) -> &SiteSettings {
        &self.current
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    pub fn in_maintenance(&self) -> bool {
        self.current.maintenance.enabled
    }

    /// Validate and replace the settings after the simulated delay.
    ///
    /// A rejected record leaves the current one untouched.
    pub async fn save(
        &mut self,
        editor: &User,
        settings: SiteSettings,
        now: DateTime<Utc>,
    ) -> DomainResult<&SiteSettings> {
        ensure_admin(editor)?;
        settings.validate()?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.current = settings;
        self.saved_at = Some(now);
        tracing::info!(
            maintenance = self.current.maintenance.enabled,
            "site settings saved"
        );
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use esst_auth::directory::{ADMIN_ID, DUBOIS_ID};
    use esst_auth::{FixedDirectory, UserDirectory};

    use super::*;
    use crate::seed;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
    }

    fn user(id: esst_core::UserId) -> User {
        FixedDirectory::seeded().find(id).unwrap().clone()
    }

    #[test]
    fn seeded_settings_are_valid() {
        let settings = seed::site_settings();
        settings.validate().unwrap();
        assert_eq!(settings.appearance.primary_color, "#1A4B8C");
        assert!(!settings.maintenance.enabled);
    }

    #[test]
    fn validation_names_the_bad_field() {
        let mut settings = seed::site_settings();
        settings.appearance.accent_color = "gold".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("appearance.accentColor"), "{err}");

        let mut settings = seed::site_settings();
        settings.general.admin_email = "admin".to_string();
        assert!(settings.validate().unwrap_err().to_string().contains("adminEmail"));

        let mut settings = seed::site_settings();
        settings.maintenance.enabled = true;
        settings.maintenance.message = " ".to_string();
        assert!(matches!(settings.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn tabs_are_labelled() {
        let labels: Vec<&str> = SettingsTab::ALL.iter().map(SettingsTab::label).collect();
        assert_eq!(labels, ["Général", "Contact", "Apparence", "SEO", "Maintenance"]);
    }

    #[tokio::test(start_paused = true)]
    async fn save_waits_then_replaces() {
        let mut store = SettingsStore::new(seed::site_settings(), DEFAULT_SAVE_DELAY);
        let mut next = seed::site_settings();
        next.maintenance.enabled = true;

        let started = tokio::time::Instant::now();
        store.save(&user(ADMIN_ID), next, now()).await.unwrap();
        assert!(started.elapsed() >= DEFAULT_SAVE_DELAY);
        assert!(store.in_maintenance());
        assert_eq!(store.saved_at(), Some(now()));
    }

    #[tokio::test]
    async fn rejected_saves_keep_the_current_record() {
        let mut store = SettingsStore::new(seed::site_settings(), Duration::ZERO);

        let mut renamed = seed::site_settings();
        renamed.general.site_name = "ESST Paris".to_string();
        assert!(matches!(
            store.save(&user(DUBOIS_ID), renamed, now()).await,
            Err(DomainError::Unauthorized(_))
        ));

        let mut broken = seed::site_settings();
        broken.general.site_name.clear();
        assert!(store.save(&user(ADMIN_ID), broken, now()).await.is_err());

        assert_eq!(store.current(), &seed::site_settings());
        assert_eq!(store.saved_at(), None);
    }
}
