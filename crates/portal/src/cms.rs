//! Content management: the admin page console.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use esst_auth::User;
use esst_core::{DomainError, DomainResult, Entity, PageId, entity};

use crate::formations::Catalog;
use crate::matches_query;
use crate::media::MediaLibrary;
use crate::projects::parse_tags;
use crate::settings::SettingsStore;

/// Site sections a page can belong to.
pub const SECTIONS: &[&str] = &[
    "Institution",
    "Formation",
    "Recherche",
    "Admission",
    "Vie Étudiante",
    "International",
    "Actualités",
    "Contact",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Draft,
    Published,
    Review,
}

impl PageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PageStatus::Draft => "Brouillon",
            PageStatus::Published => "Publié",
            PageStatus::Review => "Révision",
        }
    }
}

/// Console tabs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTab {
    Pages,
    News,
    Events,
    Formations,
    Media,
    Settings,
}

impl ContentTab {
    pub const ALL: [ContentTab; 6] = [
        ContentTab::Pages,
        ContentTab::News,
        ContentTab::Events,
        ContentTab::Formations,
        ContentTab::Media,
        ContentTab::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentTab::Pages => "Pages",
            ContentTab::News => "Actualités",
            ContentTab::Events => "Événements",
            ContentTab::Formations => "Formations",
            ContentTab::Media => "Médias",
            ContentTab::Settings => "Paramètres",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PageStatus,
    pub author: String,
    pub last_modified: DateTime<Utc>,
    pub section: String,
    #[serde(default)]
    pub meta: PageMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<NaiveDate>,
}

/// Search-engine metadata of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub description: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

impl PageMeta {
    fn from_draft(draft: &PageDraft) -> Self {
        let image = draft.featured_image.trim();
        Self {
            description: draft.meta_description.trim().to_string(),
            keywords: parse_tags(&draft.meta_keywords),
            featured_image: (!image.is_empty()).then(|| image.to_string()),
        }
    }
}

impl Entity for Page {
    type Id = PageId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFilter {
    pub query: String,
    pub status: Option<PageStatus>,
    pub section: Option<String>,
}

impl PageFilter {
    pub fn matches(&self, page: &Page) -> bool {
        matches_query(&page.title, &self.query)
            && self.status.is_none_or(|s| s == page.status)
            && self.section.as_ref().is_none_or(|s| *s == page.section)
    }
}

/// Editor form. `id: None` creates a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDraft {
    pub id: Option<PageId>,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub section: String,
    pub meta_description: String,
    /// Comma-separated.
    pub meta_keywords: String,
    pub featured_image: String,
    pub publish_date: Option<NaiveDate>,
}

/// URL slug from a title: lowercase ASCII, accents folded, words joined by `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' | 'á' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' | 'í' => 'i',
        'ô' | 'ö' | 'ó' => 'o',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'ç' => 'c',
        'ÿ' => 'y',
        other => other,
    }
}

/// Everything administrators edit: pages, the media library and the site
/// settings.
#[derive(Debug, Clone)]
pub struct ContentConsole {
    pages: Vec<Page>,
    media: MediaLibrary,
    settings: SettingsStore,
}

impl ContentConsole {
    pub fn new(pages: Vec<Page>, media: MediaLibrary, settings: SettingsStore) -> Self {
        Self {
            pages,
            media,
            settings,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn media(&self) -> &MediaLibrary {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut MediaLibrary {
        &mut self.media
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn get(&self, id: PageId) -> Option<&Page> {
        entity::find(&self.pages, id)
    }

    pub fn filter(&self, filter: &PageFilter) -> Vec<&Page> {
        self.pages.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Count shown on a tab; zero hides the badge.
    ///
    /// Events have no store and settings are a single form, so both are zero.
    pub fn tab_count(&self, tab: ContentTab, catalog: &Catalog) -> usize {
        match tab {
            ContentTab::Pages => self.pages.len(),
            ContentTab::News => catalog.news().len(),
            ContentTab::Formations => catalog.formations().len(),
            ContentTab::Media => self.media.len(),
            ContentTab::Events | ContentTab::Settings => 0,
        }
    }

    /// Create or update a page.
    pub fn save(
        &mut self,
        editor: &User,
        draft: PageDraft,
        status: PageStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<&Page> {
        ensure_admin(editor)?;
        if draft.title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        let section = draft.section.trim();
        if section.is_empty() {
            return Err(DomainError::validation("section cannot be empty"));
        }
        if !SECTIONS.contains(&section) {
            return Err(DomainError::validation(format!("unknown section '{section}'")));
        }
        let section = section.to_string();
        let meta = PageMeta::from_draft(&draft);

        let title = draft.title.trim().to_string();
        let slug = match draft.slug.trim() {
            "" => slugify(&title),
            given => slugify(given),
        };
        if slug.is_empty() {
            return Err(DomainError::validation("slug cannot be empty"));
        }
        if self
            .pages
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != draft.id)
        {
            return Err(DomainError::invariant(format!("slug '{slug}' is already used")));
        }

        let index = match draft.id {
            Some(id) => {
                let index = self
                    .pages
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or_else(|| DomainError::not_found(format!("page {id}")))?;
                let page = &mut self.pages[index];
                page.title = title;
                page.slug = slug;
                page.content = draft.content;
                page.section = section;
                page.meta = meta;
                page.publish_date = draft.publish_date.or(page.publish_date);
                page.status = status;
                page.last_modified = now;
                index
            }
            None => {
                self.pages.push(Page {
                    id: PageId::new(),
                    title,
                    slug,
                    content: draft.content,
                    status,
                    author: editor.full_name(),
                    last_modified: now,
                    section,
                    meta,
                    publish_date: draft.publish_date,
                });
                self.pages.len() - 1
            }
        };

        let page = &mut self.pages[index];
        if page.status == PageStatus::Published && page.publish_date.is_none() {
            page.publish_date = Some(now.date_naive());
        }
        let page = &self.pages[index];
        tracing::info!(page_id = %page.id, status = page.status.label(), "page saved");
        Ok(page)
    }

    pub fn delete(&mut self, editor: &User, id: PageId) -> DomainResult<Page> {
        ensure_admin(editor)?;
        let index = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(format!("page {id}")))?;
        let page = self.pages.remove(index);
        tracing::info!(page_id = %id, "page deleted");
        Ok(page)
    }
}

pub(crate) fn ensure_admin(user: &User) -> DomainResult<()> {
    if !user.role.is_admin() {
        return Err(DomainError::unauthorized("content management is reserved to administrators"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use std::time::Duration;

    use esst_auth::directory::{ADMIN_ID, DUBOIS_ID};
    use esst_auth::{FixedDirectory, UserDirectory};

    use super::*;
    use crate::seed::{self, ADMISSION_PAGE_ID, HOME_PAGE_ID};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
    }

    fn console() -> ContentConsole {
        ContentConsole::new(
            seed::pages(now()),
            MediaLibrary::new(seed::media(now())),
            SettingsStore::new(seed::site_settings(), Duration::ZERO),
        )
    }

    fn admin() -> User {
        FixedDirectory::seeded().find(ADMIN_ID).unwrap().clone()
    }

    #[test]
    fn slugs_fold_accents_and_punctuation() {
        assert_eq!(slugify("Présentation ESST"), "presentation-esst");
        assert_eq!(slugify("  Admission 2025/2026 !"), "admission-2025-2026");
        assert_eq!(slugify("Événements à venir"), "evenements-a-venir");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn filter_by_title_status_and_section() {
        let console = console();
        assert_eq!(console.filter(&PageFilter::default()).len(), 3);

        let drafts = console.filter(&PageFilter {
            status: Some(PageStatus::Draft),
            ..Default::default()
        });
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, ADMISSION_PAGE_ID);

        let institution = console.filter(&PageFilter {
            query: "accueil".to_string(),
            section: Some("Institution".to_string()),
            ..Default::default()
        });
        assert_eq!(institution.len(), 1);
    }

    #[test]
    fn save_creates_with_derived_slug() {
        let mut console = console();
        let later = now() + chrono::Duration::hours(1);
        let page = console
            .save(
                &admin(),
                PageDraft {
                    title: "Vie Étudiante".to_string(),
                    section: "Institution".to_string(),
                    ..Default::default()
                },
                PageStatus::Review,
                later,
            )
            .unwrap()
            .clone();

        assert_eq!(page.slug, "vie-etudiante");
        assert_eq!(page.author, "Pierre Dupont");
        assert_eq!(page.last_modified, later);
        assert_eq!(page.publish_date, None);
        assert_eq!(console.pages().len(), 4);
    }

    #[test]
    fn save_updates_existing_page() {
        let mut console = console();
        let draft = PageDraft {
            id: Some(ADMISSION_PAGE_ID),
            title: "Admission 2025/2026".to_string(),
            slug: "admission-2025".to_string(),
            content: "Dossiers ouverts".to_string(),
            section: "Admission".to_string(),
            meta_description: " Calendrier des admissions ".to_string(),
            meta_keywords: "admission, candidature,".to_string(),
            featured_image: "/media/campus-esst.jpg".to_string(),
            publish_date: None,
        };
        console.save(&admin(), draft, PageStatus::Published, now()).unwrap();

        let page = console.get(ADMISSION_PAGE_ID).unwrap();
        assert_eq!(page.status, PageStatus::Published);
        assert_eq!(page.content, "Dossiers ouverts");
        assert_eq!(page.author, "Marie Bernard");
        assert_eq!(page.meta.description, "Calendrier des admissions");
        assert_eq!(page.meta.keywords, ["admission", "candidature"]);
        assert_eq!(page.meta.featured_image.as_deref(), Some("/media/campus-esst.jpg"));
        assert_eq!(page.publish_date, Some(now().date_naive()));
        assert_eq!(console.pages().len(), 3);
    }

    #[test]
    fn explicit_publish_date_is_kept() {
        let mut console = console();
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let page = console
            .save(
                &admin(),
                PageDraft {
                    title: "Rentrée".to_string(),
                    section: "Vie Étudiante".to_string(),
                    publish_date: Some(date),
                    ..Default::default()
                },
                PageStatus::Published,
                now(),
            )
            .unwrap();
        assert_eq!(page.publish_date, Some(date));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let mut console = console();
        let draft = PageDraft {
            title: "Sport".to_string(),
            section: "Sport".to_string(),
            ..Default::default()
        };
        let err = console.save(&admin(), draft, PageStatus::Draft, now()).unwrap_err();
        assert_eq!(err, DomainError::validation("unknown section 'Sport'"));
        assert_eq!(console.pages().len(), 3);

        for section in SECTIONS {
            let draft = PageDraft {
                title: format!("Page {section}"),
                section: section.to_string(),
                ..Default::default()
            };
            assert!(console.save(&admin(), draft, PageStatus::Draft, now()).is_ok());
        }
    }

    #[test]
    fn save_rejects_missing_fields_and_duplicate_slugs() {
        let mut console = console();
        let untitled = PageDraft {
            section: "Institution".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            console.save(&admin(), untitled, PageStatus::Draft, now()),
            Err(DomainError::Validation(_))
        ));

        let duplicate = PageDraft {
            title: "Accueil".to_string(),
            section: "Institution".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            console.save(&admin(), duplicate, PageStatus::Draft, now()),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn only_admins_edit_content() {
        let mut console = console();
        let teacher = FixedDirectory::seeded().find(DUBOIS_ID).unwrap().clone();
        assert!(matches!(
            console.delete(&teacher, HOME_PAGE_ID),
            Err(DomainError::Unauthorized(_))
        ));

        let removed = console.delete(&admin(), HOME_PAGE_ID).unwrap();
        assert_eq!(removed.slug, "accueil");
        assert!(console.get(HOME_PAGE_ID).is_none());
        assert!(console.delete(&admin(), HOME_PAGE_ID).is_err());
    }

    #[test]
    fn tab_counts_come_from_the_stores() {
        let console = console();
        let catalog = Catalog::new(seed::formations(), seed::news(now()));
        let count = |tab| console.tab_count(tab, &catalog);

        assert_eq!(count(ContentTab::Pages), 3);
        assert_eq!(count(ContentTab::News), catalog.news().len());
        assert_eq!(count(ContentTab::Formations), catalog.formations().len());
        assert_eq!(count(ContentTab::Media), 4);
        assert_eq!(count(ContentTab::Events), 0);
        assert_eq!(count(ContentTab::Settings), 0);
    }

    #[test]
    fn tabs_are_labelled() {
        let labels: Vec<&str> = ContentTab::ALL.iter().map(ContentTab::label).collect();
        assert_eq!(
            labels,
            ["Pages", "Actualités", "Événements", "Formations", "Médias", "Paramètres"]
        );
    }
}
