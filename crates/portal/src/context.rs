//! The portal context: session plus content stores, behind one owner.

use chrono::{DateTime, Utc};

use esst_auth::{
    LoginError, Route, RouteDenied, Session, SessionStorage, User, UserDirectory, routes,
};
use esst_core::{ConversationId, DomainError, DomainResult, MediaId, PageId, ProjectId};

use crate::cms::{ContentConsole, ContentTab, Page, PageDraft, PageStatus};
use crate::dashboard::DashboardView;
use crate::formations::Catalog;
use crate::media::{MediaItem, MediaLibrary, NewMedia};
use crate::messaging::{Conversation, Inbox, Message};
use crate::projects::{NewProject, Project, ProjectBoard};
use crate::seed;
use crate::settings::{DEFAULT_SAVE_DELAY, SettingsStore, SiteSettings};

/// Outcome of asking to open a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(&'static Route),
    Redirect {
        to: &'static str,
        reason: RouteDenied,
    },
}

impl Navigation {
    pub fn is_render(&self) -> bool {
        matches!(self, Navigation::Render(_))
    }

    /// Path the viewer ends up on.
    pub fn target(&self) -> &'static str {
        match self {
            Navigation::Render(route) => route.path,
            Navigation::Redirect { to, .. } => *to,
        }
    }
}

/// Application context.
///
/// All state lives here and is mutated through `&mut self`; no globals.
pub struct PortalContext<D, S> {
    session: Session<D, S>,
    inbox: Inbox,
    projects: ProjectBoard,
    content: ContentConsole,
    catalog: Catalog,
}

impl<D: UserDirectory, S: SessionStorage> PortalContext<D, S> {
    pub fn new(
        session: Session<D, S>,
        inbox: Inbox,
        projects: ProjectBoard,
        content: ContentConsole,
        catalog: Catalog,
    ) -> Self {
        Self {
            session,
            inbox,
            projects,
            content,
            catalog,
        }
    }

    /// Context with the demo content, timestamps relative to `now`.
    pub fn seeded(session: Session<D, S>, now: DateTime<Utc>) -> Self {
        Self::new(
            session,
            Inbox::new(seed::conversations(now)),
            ProjectBoard::new(seed::projects(now)),
            ContentConsole::new(
                seed::pages(now),
                MediaLibrary::new(seed::media(now)),
                SettingsStore::new(seed::site_settings(), DEFAULT_SAVE_DELAY),
            ),
            Catalog::new(seed::formations(), seed::news(now)),
        )
    }

    pub fn session(&self) -> &Session<D, S> {
        &self.session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, LoginError> {
        self.session.login(email, password)
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Run the route guard for `path`.
    pub fn navigate(&self, path: &str) -> Navigation {
        match self.session.guard(path) {
            Ok(route) => Navigation::Render(route),
            Err(reason) => Navigation::Redirect {
                to: reason.redirect_to(),
                reason,
            },
        }
    }

    /// Where to land after a successful login.
    pub fn home(&self) -> &'static str {
        if self.session.is_authenticated() {
            routes::DASHBOARD_PATH
        } else {
            routes::LOGIN_PATH
        }
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub fn search_conversations(&self, query: &str) -> DomainResult<Vec<&Conversation>> {
        let user = signed_in(&self.session)?;
        Ok(self.inbox.search(user.id, query, self.session.directory()))
    }

    pub fn open_conversation(&mut self, id: ConversationId) -> DomainResult<&[Message]> {
        let user = signed_in(&self.session)?.id;
        self.inbox.open(id, user)
    }

    pub fn send_message(
        &mut self,
        id: ConversationId,
        content: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<&Message> {
        let user = signed_in(&self.session)?.id;
        self.inbox.send(id, user, content, now)
    }

    pub fn projects(&self) -> &ProjectBoard {
        &self.projects
    }

    pub fn create_project(&mut self, new: NewProject, now: DateTime<Utc>) -> DomainResult<&Project> {
        let user = signed_in(&self.session)?;
        self.projects.create(user, new, now)
    }

    /// Join a project; `Ok(false)` if already a participant.
    pub fn join_project(&mut self, id: ProjectId) -> DomainResult<bool> {
        let user = signed_in(&self.session)?.id;
        self.projects.join(id, user)
    }

    pub fn content(&self) -> &ContentConsole {
        &self.content
    }

    pub fn save_page(
        &mut self,
        draft: PageDraft,
        status: PageStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<&Page> {
        let user = signed_in(&self.session)?;
        self.content.save(user, draft, status, now)
    }

    pub fn delete_page(&mut self, id: PageId) -> DomainResult<Page> {
        let user = signed_in(&self.session)?;
        self.content.delete(user, id)
    }

    /// Badge count of a content console tab.
    pub fn content_tab_count(&self, tab: ContentTab) -> usize {
        self.content.tab_count(tab, &self.catalog)
    }

    pub fn upload_media(&mut self, new: NewMedia, now: DateTime<Utc>) -> DomainResult<&MediaItem> {
        let user = signed_in(&self.session)?;
        self.content.media_mut().upload(user, new, now)
    }

    pub fn delete_media(&mut self, id: MediaId) -> DomainResult<MediaItem> {
        let user = signed_in(&self.session)?;
        self.content.media_mut().delete(user, id)
    }

    pub async fn save_settings(
        &mut self,
        settings: SiteSettings,
        now: DateTime<Utc>,
    ) -> DomainResult<&SiteSettings> {
        let user = signed_in(&self.session)?;
        self.content.settings_mut().save(user, settings, now).await
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Dashboard for the signed-in user at the given local hour.
    pub fn dashboard(&self, hour: u32) -> DomainResult<DashboardView> {
        let user = signed_in(&self.session)?;
        Ok(DashboardView::build(
            user,
            hour,
            self.session.directory(),
            &self.inbox,
            &self.projects,
            &self.catalog,
        ))
    }
}

fn signed_in<D: UserDirectory, S: SessionStorage>(session: &Session<D, S>) -> DomainResult<&User> {
    session
        .current_user()
        .ok_or_else(|| DomainError::unauthorized("sign in required"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use esst_auth::{FixedDirectory, MemoryStorage};

    use super::*;
    use crate::seed::DUBOIS_MARTIN_ID;

    type TestContext = PortalContext<FixedDirectory, Arc<MemoryStorage>>;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
    }

    fn context() -> TestContext {
        let session = Session::init(FixedDirectory::seeded(), Arc::new(MemoryStorage::new()));
        PortalContext::seeded(session, now())
    }

    #[test]
    fn anonymous_viewer_is_sent_to_login() {
        let ctx = context();
        assert!(ctx.navigate("/").is_render());
        assert!(ctx.navigate("/formations").is_render());

        let nav = ctx.navigate("/messaging");
        assert_eq!(nav.target(), "/login");
        assert!(matches!(
            nav,
            Navigation::Redirect {
                reason: RouteDenied::Unauthenticated { .. },
                ..
            }
        ));
        assert_eq!(ctx.navigate("/admin/cms").target(), "/login");
        assert_eq!(ctx.home(), "/login");
    }

    #[test]
    fn wrong_role_is_sent_to_dashboard_and_unknown_paths_home() {
        let mut ctx = context();
        ctx.login("sophie.martin@student.esst.edu", "password").unwrap();

        assert_eq!(ctx.navigate("/admin/cms").target(), "/dashboard");
        assert_eq!(ctx.navigate("/teacher/courses").target(), "/dashboard");
        assert!(ctx.navigate("/student/courses/list").is_render());
        assert_eq!(ctx.navigate("/nowhere").target(), "/");
        assert_eq!(ctx.home(), "/dashboard");
    }

    #[test]
    fn content_operations_require_a_session() {
        let mut ctx = context();
        assert!(matches!(ctx.dashboard(9), Err(DomainError::Unauthorized(_))));
        assert!(ctx.send_message(DUBOIS_MARTIN_ID, "salut", now()).is_err());
        assert!(ctx.search_conversations("").is_err());
    }

    #[test]
    fn dashboard_reflects_live_stores() {
        let mut ctx = context();
        ctx.login("sophie.martin@student.esst.edu", "password").unwrap();

        let view = ctx.dashboard(9).unwrap();
        assert_eq!(view.headline, "Bonjour, Sophie !");
        assert_eq!(view.quick_actions[0].count, Some(2));
        assert_eq!(view.quick_actions[1].count, Some(2));
        assert_eq!(view.recent_conversations[0].name, "Michel Dubois");
        assert_eq!(view.latest_news.len(), 2);

        ctx.open_conversation(DUBOIS_MARTIN_ID).unwrap();
        ctx.create_project(
            NewProject {
                title: "Robot".to_string(),
                description: "Suiveur de ligne".to_string(),
                category: "Robotique".to_string(),
                tags: String::new(),
            },
            now(),
        )
        .unwrap();

        let view = ctx.dashboard(20).unwrap();
        assert_eq!(view.headline, "Bonsoir, Sophie !");
        assert_eq!(view.quick_actions[0].count, None);
        assert_eq!(view.quick_actions[1].count, Some(3));
        assert_eq!(view.active_projects[0].title, "Robot");
    }

    #[test]
    fn only_admins_reach_the_content_console() {
        let mut ctx = context();
        ctx.login("prof.dubois@esst.edu", "password").unwrap();
        assert!(matches!(
            ctx.delete_page(seed::HOME_PAGE_ID),
            Err(DomainError::Unauthorized(_))
        ));

        ctx.logout();
        ctx.login("admin@esst.edu", "password").unwrap();
        assert!(ctx.delete_page(seed::HOME_PAGE_ID).is_ok());
        assert_eq!(ctx.content().pages().len(), 2);
        assert_eq!(ctx.content_tab_count(ContentTab::Pages), 2);
    }

    #[test]
    fn media_tab_tracks_uploads() {
        let mut ctx = context();
        assert_eq!(ctx.content_tab_count(ContentTab::Media), 4);

        let upload = NewMedia {
            name: "amphi.webp".to_string(),
            size: 4096,
            ..Default::default()
        };
        assert!(ctx.upload_media(upload.clone(), now()).is_err());

        ctx.login("admin@esst.edu", "password").unwrap();
        let id = ctx.upload_media(upload, now()).unwrap().id;
        assert_eq!(ctx.content_tab_count(ContentTab::Media), 5);
        ctx.delete_media(id).unwrap();
        assert_eq!(ctx.content_tab_count(ContentTab::Media), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn settings_are_saved_by_admins() {
        let mut ctx = context();
        ctx.login("admin@esst.edu", "password").unwrap();

        let mut settings = ctx.content().settings().current().clone();
        settings.general.site_description = "Sciences & Technologies".to_string();
        ctx.save_settings(settings, now()).await.unwrap();

        let store = ctx.content().settings();
        assert_eq!(store.current().general.site_description, "Sciences & Technologies");
        assert_eq!(store.saved_at(), Some(now()));
    }
}
