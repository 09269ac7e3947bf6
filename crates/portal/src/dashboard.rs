//! Role-aware dashboard.

use serde::Serialize;

use esst_auth::{Role, User, UserDirectory};
use esst_core::{ConversationId, NewsId, ProjectId};

use crate::formations::Catalog;
use crate::messaging::Inbox;
use crate::projects::{ProjectBoard, ProjectStatus};

const RECENT_CONVERSATIONS: usize = 3;
const ACTIVE_PROJECTS: usize = 3;
const LATEST_NEWS: usize = 2;

/// Greeting for an hour of the day (0..=23).
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..12 => "Bonjour",
        12..18 => "Bon après-midi",
        _ => "Bonsoir",
    }
}

/// Live figures the quick actions can display.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub unread_messages: usize,
    pub projects: usize,
    pub users: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Counter {
    UnreadMessages,
    Projects,
    Users,
}

impl Counter {
    fn read(self, counts: &DashboardCounts) -> usize {
        match self {
            Counter::UnreadMessages => counts.unread_messages,
            Counter::Projects => counts.projects,
            Counter::Users => counts.users,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct ActionSpec {
    label: &'static str,
    path: &'static str,
    counter: Option<Counter>,
}

const fn action(label: &'static str, path: &'static str, counter: Option<Counter>) -> ActionSpec {
    ActionSpec {
        label,
        path,
        counter,
    }
}

const MESSAGES: ActionSpec = action("Messages", "/messaging", Some(Counter::UnreadMessages));
const PROJECTS: ActionSpec = action("Projets", "/projects", Some(Counter::Projects));

const ADMIN_ACTIONS: &[ActionSpec] = &[
    MESSAGES,
    PROJECTS,
    action("Utilisateurs", "/admin/users", Some(Counter::Users)),
    action("Statistiques", "/admin/stats", None),
];

const TEACHER_ACTIONS: &[ActionSpec] = &[
    MESSAGES,
    PROJECTS,
    action("Mes Cours", "/teacher/courses", None),
    action("Étudiants", "/teacher/students", None),
];

const STUDENT_ACTIONS: &[ActionSpec] = &[
    MESSAGES,
    PROJECTS,
    action("Mes Cours", "/student/courses", None),
    action("Planning", "/student/schedule", None),
];

const VISITOR_ACTIONS: &[ActionSpec] = &[MESSAGES, PROJECTS];

static QUICK_ACTIONS: [&[ActionSpec]; 4] =
    [ADMIN_ACTIONS, TEACHER_ACTIONS, STUDENT_ACTIONS, VISITOR_ACTIONS];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub path: &'static str,
    /// Hidden when zero.
    pub count: Option<usize>,
}

/// Quick-action tiles for a role.
pub fn quick_actions(role: Role, counts: &DashboardCounts) -> Vec<QuickAction> {
    QUICK_ACTIONS[role.index()]
        .iter()
        .map(|spec| QuickAction {
            label: spec.label,
            path: spec.path,
            count: spec
                .counter
                .map(|counter| counter.read(counts))
                .filter(|n| *n > 0),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub name: String,
    pub unread_count: u32,
    pub last_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub title: String,
    pub category: String,
    pub participants: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSummary {
    pub id: NewsId,
    pub title: String,
    pub excerpt: String,
}

/// Everything the dashboard page shows, for one signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// e.g. `Bonjour, Sophie !`
    pub headline: String,
    pub quick_actions: Vec<QuickAction>,
    pub recent_conversations: Vec<ConversationSummary>,
    pub active_projects: Vec<ProjectSummary>,
    pub latest_news: Vec<NewsSummary>,
}

impl DashboardView {
    pub fn build(
        user: &User,
        hour: u32,
        directory: &impl UserDirectory,
        inbox: &Inbox,
        board: &ProjectBoard,
        catalog: &Catalog,
    ) -> Self {
        let counts = DashboardCounts {
            unread_messages: inbox.unread_total(user.id) as usize,
            projects: board.len(),
            users: directory.len(),
        };

        let recent_conversations = inbox
            .conversations_for(user.id)
            .take(RECENT_CONVERSATIONS)
            .map(|conv| ConversationSummary {
                id: conv.id,
                name: conv.display_name(user.id, directory),
                unread_count: conv.unread_count,
                last_message: conv.last_message().map(|m| m.content.clone()),
            })
            .collect();

        let active_projects = board
            .projects()
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .take(ACTIVE_PROJECTS)
            .map(|p| ProjectSummary {
                id: p.id,
                title: p.title.clone(),
                category: p.category.clone(),
                participants: p.participants.len(),
            })
            .collect();

        let latest_news = catalog
            .latest_news(LATEST_NEWS)
            .iter()
            .map(|n| NewsSummary {
                id: n.id,
                title: n.title.clone(),
                excerpt: n.excerpt.clone(),
            })
            .collect();

        Self {
            headline: format!("{}, {} !", greeting(hour), user.first_name),
            quick_actions: quick_actions(user.role, &counts),
            recent_conversations,
            active_projects,
            latest_news,
        }
    }
}
