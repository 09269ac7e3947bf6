//! `esst-portal`: the ESST portal logic core.
//!
//! Owns the session, the content stores (messaging, projects, CMS pages,
//! media, site settings, formations and news) and the navigation guard behind one
//! [`PortalContext`]. Rendering is out of scope: every operation returns
//! plain data.

pub mod cms;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod formations;
pub mod media;
pub mod messaging;
pub mod projects;
pub mod seed;
pub mod settings;

pub use cms::{ContentConsole, ContentTab, Page, PageDraft, PageFilter, PageMeta, PageStatus};
pub use config::{ConfigError, PortalConfig};
pub use context::{Navigation, PortalContext};
pub use dashboard::{DashboardCounts, DashboardView, QuickAction, greeting, quick_actions};
pub use formations::{Catalog, Formation, FormationFilter, NewsItem};
pub use media::{MediaFilter, MediaItem, MediaLibrary, MediaType, NewMedia, format_file_size};
pub use messaging::{Conversation, Inbox, Message};
pub use projects::{NewProject, Project, ProjectBoard, ProjectFilter, ProjectStatus};
pub use settings::{SettingsStore, SettingsTab, SiteSettings};

/// Case-insensitive substring match; an empty query matches everything.
pub(crate) fn matches_query(haystack: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || haystack.to_lowercase().contains(&query.to_lowercase())
}
