//! Static per-role capability table.

use serde::Serialize;

use crate::Role;
use crate::menu::{ADMIN_MENU, MenuEntry, STUDENT_MENU, TEACHER_MENU, VISITOR_MENU};

/// Everything the portal derives from a role, in one row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoleProfile {
    pub role: Role,
    pub label: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub menu: &'static [MenuEntry],
    /// Whether users of this role may start collaborative projects.
    pub can_create_projects: bool,
}

static PROFILES: [RoleProfile; 4] = [
    RoleProfile {
        role: Role::Admin,
        label: "Administrateur",
        description: "Gestion complète de la plateforme et des utilisateurs",
        features: &[
            "Gestion des utilisateurs",
            "Administration système",
            "Contrôle total",
        ],
        menu: ADMIN_MENU,
        can_create_projects: true,
    },
    RoleProfile {
        role: Role::Teacher,
        label: "Enseignant",
        description: "Création de cours, gestion des étudiants et projets",
        features: &[
            "Création de cours",
            "Gestion des étudiants",
            "Supervision de projets",
        ],
        menu: TEACHER_MENU,
        can_create_projects: true,
    },
    RoleProfile {
        role: Role::Student,
        label: "Étudiant",
        description: "Accès aux cours, participation aux projets collaboratifs",
        features: &[
            "Accès aux cours",
            "Projets collaboratifs",
            "Ressources pédagogiques",
        ],
        menu: STUDENT_MENU,
        can_create_projects: true,
    },
    RoleProfile {
        role: Role::Visitor,
        label: "Visiteur",
        description: "Découverte des formations et informations générales",
        features: &[
            "Catalogue formations",
            "Informations générales",
            "Demandes de renseignements",
        ],
        menu: VISITOR_MENU,
        can_create_projects: false,
    },
];

/// Look up the profile row for a role.
pub fn profile(role: Role) -> &'static RoleProfile {
    &PROFILES[role.index()]
}

/// All profiles, in [`Role::ALL`] order (role-selection step).
pub fn profiles() -> &'static [RoleProfile] {
    &PROFILES
}
