//! Role-derived navigation menus.
//!
//! Menus are static data; [`menu_for`] is a table lookup and never branches on
//! the role beyond selecting the table row.

use serde::Serialize;

use crate::Role;

/// One sidebar entry, optionally with a submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub children: &'static [MenuEntry],
}

impl MenuEntry {
    pub const fn link(label: &'static str, path: &'static str) -> Self {
        Self {
            label,
            path,
            children: &[],
        }
    }

    pub const fn group(
        label: &'static str,
        path: &'static str,
        children: &'static [MenuEntry],
    ) -> Self {
        Self {
            label,
            path,
            children,
        }
    }

    pub fn has_submenu(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A flattened menu entry: (label, path) plus its nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
    pub depth: usize,
}

/// Sidebar entries for a role.
pub fn menu_for(role: Role) -> &'static [MenuEntry] {
    role.profile().menu
}

/// Ordered (label, path) pairs for a role, flattened depth-first.
pub fn navigation(role: Role) -> Vec<NavLink> {
    let mut out = Vec::new();
    flatten_into(menu_for(role), 0, &mut out);
    out
}

fn flatten_into(entries: &'static [MenuEntry], depth: usize, out: &mut Vec<NavLink>) {
    for entry in entries {
        out.push(NavLink {
            label: entry.label,
            path: entry.path,
            depth,
        });
        flatten_into(entry.children, depth + 1, out);
    }
}

/// Whether a menu entry is highlighted for the current location.
pub fn is_active(current: &str, path: &str) -> bool {
    current == path
        || current
            .strip_prefix(path)
            .is_some_and(|rest| rest.starts_with('/'))
}

const DASHBOARD: MenuEntry = MenuEntry::link("Tableau de bord", "/dashboard");
const MESSAGES: MenuEntry = MenuEntry::link("Messages", "/messaging");
const NEWS: MenuEntry = MenuEntry::link("Actualités", "/actualites");

pub(crate) const ADMIN_MENU: &[MenuEntry] = &[
    DASHBOARD,
    MESSAGES,
    MenuEntry::group(
        "Gestion Contenu",
        "/admin/cms",
        &[
            MenuEntry::link("Pages", "/admin/cms/pages"),
            MenuEntry::link("Actualités", "/admin/cms/news"),
            MenuEntry::link("Événements", "/admin/cms/events"),
            MenuEntry::link("Formations", "/admin/cms/formations"),
            MenuEntry::link("Médias", "/admin/media"),
            MenuEntry::link("Nouveau contenu", "/admin/cms/editor/new"),
        ],
    ),
    MenuEntry::group(
        "Utilisateurs",
        "/admin/users",
        &[
            MenuEntry::link("Tous les utilisateurs", "/admin/users/all"),
            MenuEntry::link("Administrateurs", "/admin/users/admins"),
            MenuEntry::link("Enseignants", "/admin/users/teachers"),
            MenuEntry::link("Étudiants", "/admin/users/students"),
            MenuEntry::link("Visiteurs", "/admin/users/visitors"),
            MenuEntry::link("Ajouter utilisateur", "/admin/users/create"),
        ],
    ),
    MenuEntry::group(
        "Projets",
        "/projects",
        &[
            MenuEntry::link("Tous les projets", "/projects/all"),
            MenuEntry::link("Créer un projet", "/projects/create"),
            MenuEntry::link("Projets supervisés", "/admin/projects/supervised"),
        ],
    ),
    MenuEntry::group(
        "Statistiques",
        "/admin/stats",
        &[
            MenuEntry::link("Vue d'ensemble", "/admin/stats/overview"),
            MenuEntry::link("Utilisateurs", "/admin/stats/users"),
            MenuEntry::link("Projets", "/admin/stats/projects"),
            MenuEntry::link("Messages", "/admin/stats/messages"),
        ],
    ),
    MenuEntry::group(
        "Paramètres",
        "/admin/settings",
        &[
            MenuEntry::link("Configuration générale", "/admin/settings/general"),
            MenuEntry::link("Apparence", "/admin/settings/appearance"),
            MenuEntry::link("Droits et permissions", "/admin/settings/permissions"),
            MenuEntry::link("Notifications", "/admin/settings/notifications"),
            MenuEntry::link("Sauvegarde", "/admin/settings/backup"),
        ],
    ),
];

pub(crate) const TEACHER_MENU: &[MenuEntry] = &[
    DASHBOARD,
    MESSAGES,
    MenuEntry::group(
        "Mes Cours",
        "/teacher/courses",
        &[
            MenuEntry::link("Liste des cours", "/teacher/courses/list"),
            MenuEntry::link("Ajouter un cours", "/teacher/courses/create"),
            MenuEntry::link("Ressources pédagogiques", "/teacher/resources"),
            MenuEntry::link("Modifier ressources", "/teacher/resources/edit"),
        ],
    ),
    MenuEntry::group(
        "Emploi du Temps",
        "/teacher/schedule",
        &[
            MenuEntry::link("Mon planning", "/teacher/schedule/view"),
            MenuEntry::link("Disponibilités", "/teacher/schedule/availability"),
        ],
    ),
    MenuEntry::group(
        "Étudiants",
        "/teacher/students",
        &[
            MenuEntry::link("Mes étudiants", "/teacher/students/list"),
            MenuEntry::link("Évaluations", "/teacher/students/grades"),
            MenuEntry::link("Communication", "/teacher/students/messages"),
        ],
    ),
    MenuEntry::group(
        "Projets",
        "/projects",
        &[
            MenuEntry::link("Tous les projets", "/projects/all"),
            MenuEntry::link("Mes projets", "/teacher/projects/mine"),
            MenuEntry::link("Créer un projet", "/projects/create"),
            MenuEntry::link("Projets supervisés", "/teacher/projects/supervised"),
        ],
    ),
    NEWS,
];

pub(crate) const STUDENT_MENU: &[MenuEntry] = &[
    DASHBOARD,
    MESSAGES,
    MenuEntry::group(
        "Mes Cours",
        "/student/courses",
        &[
            MenuEntry::link("Liste des cours", "/student/courses/list"),
            MenuEntry::link("Ressources", "/student/courses/resources"),
            MenuEntry::link("Notes et évaluations", "/student/grades"),
        ],
    ),
    MenuEntry::group(
        "Emploi du Temps",
        "/student/schedule",
        &[
            MenuEntry::link("Mon planning", "/student/schedule/view"),
            MenuEntry::link("Prochains cours", "/student/schedule/upcoming"),
        ],
    ),
    MenuEntry::group(
        "Projets",
        "/projects",
        &[
            MenuEntry::link("Tous les projets", "/projects/all"),
            MenuEntry::link("Mes projets", "/student/projects/mine"),
            MenuEntry::link("Projets disponibles", "/projects/available"),
        ],
    ),
    MenuEntry::group(
        "Vie Étudiante",
        "/vie-etudiante",
        &[
            MenuEntry::link("Associations", "/vie-etudiante/associations"),
            MenuEntry::link("Événements", "/vie-etudiante/events"),
            MenuEntry::link("Services campus", "/vie-etudiante/services"),
        ],
    ),
    NEWS,
];

pub(crate) const VISITOR_MENU: &[MenuEntry] = &[
    DASHBOARD,
    MenuEntry::group(
        "Formations",
        "/formations",
        &[
            MenuEntry::link("Catalogue formations", "/formations/catalog"),
            MenuEntry::link("Demande d'information", "/formations/request-info"),
        ],
    ),
    NEWS,
    MenuEntry::group(
        "Contact",
        "/contact",
        &[
            MenuEntry::link("Formulaire contact", "/contact/form"),
            MenuEntry::link("Demandes spécifiques", "/contact/requests"),
        ],
    ),
];
