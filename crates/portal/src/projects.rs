//! Collaborative projects board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use esst_auth::User;
use esst_core::{DomainError, DomainResult, Entity, ProjectId, UserId, entity};

use crate::matches_query;

/// Categories a project can be filed under.
pub const PROJECT_CATEGORIES: &[&str] = &[
    "Intelligence Artificielle",
    "Développement Mobile",
    "Sciences",
    "Informatique",
    "Biotechnologie",
    "Robotique",
    "Cybersécurité",
    "Data Science",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
    Paused,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "Actif",
            ProjectStatus::Completed => "Terminé",
            ProjectStatus::Paused => "En pause",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub participants: Vec<UserId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub status: ProjectStatus,
    pub tags: Vec<String>,
    pub resources: Vec<String>,
}

impl Project {
    pub fn has_participant(&self, user: UserId) -> bool {
        self.participants.contains(&user)
    }
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Board filter. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub query: String,
    pub category: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        (matches_query(&project.title, &self.query)
            || matches_query(&project.description, &self.query))
            && self.category.as_ref().is_none_or(|c| *c == project.category)
            && self.status.is_none_or(|s| s == project.status)
    }
}

/// Project creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category: String,
    /// Comma-separated.
    pub tags: String,
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Projects, newest first.
#[derive(Debug, Clone, Default)]
pub struct ProjectBoard {
    projects: Vec<Project>,
}

impl ProjectBoard {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        entity::find(&self.projects, id)
    }

    pub fn filter(&self, filter: &ProjectFilter) -> Vec<&Project> {
        self.projects.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Create a project owned by `author`, who becomes its first participant.
    pub fn create(
        &mut self,
        author: &User,
        new: NewProject,
        now: DateTime<Utc>,
    ) -> DomainResult<&Project> {
        if !author.role.profile().can_create_projects {
            return Err(DomainError::unauthorized(format!(
                "role {} cannot create projects",
                author.role
            )));
        }
        ensure_filled("title", &new.title)?;
        ensure_filled("description", &new.description)?;
        ensure_filled("category", &new.category)?;
        let category = new.category.trim();
        if !PROJECT_CATEGORIES.contains(&category) {
            return Err(DomainError::validation(format!("unknown category '{category}'")));
        }

        let project = Project {
            id: ProjectId::new(),
            title: new.title.trim().to_string(),
            description: new.description.trim().to_string(),
            category: category.to_string(),
            participants: vec![author.id],
            created_by: author.id,
            created_at: now,
            status: ProjectStatus::Active,
            tags: parse_tags(&new.tags),
            resources: Vec::new(),
        };
        tracing::info!(project_id = %project.id, author_id = %author.id, "project created");

        self.projects.insert(0, project);
        Ok(&self.projects[0])
    }

    /// Add a participant. Returns `false` if they already were one.
    pub fn join(&mut self, id: ProjectId, user: UserId) -> DomainResult<bool> {
        let project = entity::find_mut(&mut self.projects, id)
            .ok_or_else(|| DomainError::not_found(format!("project {id}")))?;
        if project.has_participant(user) {
            return Ok(false);
        }
        project.participants.push(user);
        tracing::debug!(project_id = %id, user_id = %user, "joined project");
        Ok(true)
    }

    pub fn active_count(&self) -> usize {
        self.projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count()
    }

    /// Projects the user takes part in.
    pub fn projects_of(&self, user: UserId) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(move |p| p.has_participant(user))
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

fn ensure_filled(what: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{what} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use esst_auth::directory::{BERNARD_ID, DUBOIS_ID, MARTIN_ID};
    use esst_auth::{FixedDirectory, Role, UserDirectory};
    use esst_core::UserId;

    use super::*;
    use crate::seed::{self, MOBILE_APP_PROJECT_ID, RECOMMENDER_PROJECT_ID};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
    }

    fn board() -> ProjectBoard {
        ProjectBoard::new(seed::projects(now()))
    }

    fn form(title: &str, tags: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: "Un robot suiveur de ligne".to_string(),
            category: "Robotique".to_string(),
            tags: tags.to_string(),
        }
    }

    #[test]
    fn filter_by_query_category_and_status() {
        let board = board();

        let all = board.filter(&ProjectFilter::default());
        assert_eq!(all.len(), 2);

        let by_description = board.filter(&ProjectFilter {
            query: "SERVICES UNIVERSITAIRES".to_string(),
            ..Default::default()
        });
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, MOBILE_APP_PROJECT_ID);

        let by_category = board.filter(&ProjectFilter {
            category: Some("Intelligence Artificielle".to_string()),
            ..Default::default()
        });
        assert_eq!(by_category[0].id, RECOMMENDER_PROJECT_ID);

        let paused = board.filter(&ProjectFilter {
            status: Some(ProjectStatus::Paused),
            ..Default::default()
        });
        assert!(paused.is_empty());
    }

    #[test]
    fn create_puts_newest_first_with_author_as_participant() {
        let mut board = board();
        let dir = FixedDirectory::seeded();
        let author = dir.find(MARTIN_ID).unwrap();

        let project = board
            .create(author, form("Robot", " robotique, ,Arduino ,"), now())
            .unwrap()
            .clone();
        assert_eq!(project.participants, vec![MARTIN_ID]);
        assert_eq!(project.created_by, MARTIN_ID);
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.tags, vec!["robotique", "Arduino"]);
        assert_eq!(board.projects()[0].id, project.id);
        assert_eq!(board.active_count(), 3);
    }

    #[test]
    fn visitors_cannot_create_projects() {
        let mut board = board();
        let visitor = User::new(UserId::new(), "v@mail.fr", "Vic", "Tor", Role::Visitor);
        assert!(matches!(
            board.create(&visitor, form("Robot", ""), now()),
            Err(DomainError::Unauthorized(_))
        ));
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn create_requires_title() {
        let mut board = board();
        let dir = FixedDirectory::seeded();
        let author = dir.find(DUBOIS_ID).unwrap();
        assert!(matches!(
            board.create(author, form("   ", ""), now()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_unknown_categories() {
        let mut board = board();
        let dir = FixedDirectory::seeded();
        let author = dir.find(MARTIN_ID).unwrap();

        let mut new = form("Fusée", "");
        new.category = "Astronomie".to_string();
        let err = board.create(author, new, now()).unwrap_err();
        assert_eq!(err, DomainError::validation("unknown category 'Astronomie'"));
        assert_eq!(board.len(), 2);

        let mut new = form("Drone", "");
        new.category = " Data Science ".to_string();
        assert_eq!(board.create(author, new, now()).unwrap().category, "Data Science");
    }

    #[test]
    fn join_is_idempotent() {
        let mut board = board();
        assert!(!board.join(RECOMMENDER_PROJECT_ID, BERNARD_ID).unwrap());

        let newcomer = UserId::new();
        assert!(board.join(MOBILE_APP_PROJECT_ID, newcomer).unwrap());
        assert!(!board.join(MOBILE_APP_PROJECT_ID, newcomer).unwrap());
        assert_eq!(board.get(MOBILE_APP_PROJECT_ID).unwrap().participants.len(), 3);

        assert!(board.join(ProjectId::seeded(42), newcomer).is_err());
    }

    #[test]
    fn status_labels_and_tags() {
        assert_eq!(ProjectStatus::Paused.label(), "En pause");
        assert!(parse_tags(" , ,").is_empty());
        assert_eq!(board().projects_of(DUBOIS_ID).count(), 1);
    }
}
