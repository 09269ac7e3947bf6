//! Static route table and the route guard.

use serde::Serialize;
use thiserror::Error;

use crate::Role;

/// Access requirement attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "roles")]
pub enum Access {
    /// Renders for anyone, signed in or not.
    Public,
    /// Requires a signed-in user of any role.
    Authenticated,
    /// Requires a signed-in user holding one of the listed roles.
    Roles(&'static [Role]),
}

impl Access {
    /// Whether a viewer with the given role (`None` = anonymous) satisfies this
    /// requirement.
    pub fn permits(&self, role: Option<Role>) -> bool {
        match (self, role) {
            (Access::Public, _) => true,
            (_, None) => false,
            (Access::Authenticated, Some(_)) => true,
            (Access::Roles(allowed), Some(role)) => allowed.contains(&role),
        }
    }
}

/// A routed section of the portal. The path matches itself and every
/// sub-path below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub title: &'static str,
    pub access: Access,
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const TEACHER_ONLY: &[Role] = &[Role::Teacher];
const STUDENT_ONLY: &[Role] = &[Role::Student];

pub static ROUTES: &[Route] = &[
    Route { path: "/", title: "Accueil", access: Access::Public },
    Route { path: "/login", title: "Connexion", access: Access::Public },
    Route { path: "/register", title: "Inscription", access: Access::Public },
    Route { path: "/formations", title: "Formations", access: Access::Public },
    Route { path: "/actualites", title: "Actualités", access: Access::Public },
    Route { path: "/contact", title: "Contact", access: Access::Public },
    Route { path: "/dashboard", title: "Tableau de bord", access: Access::Authenticated },
    Route { path: "/messaging", title: "Messages", access: Access::Authenticated },
    Route { path: "/projects", title: "Projets", access: Access::Authenticated },
    Route { path: "/admin", title: "Administration", access: Access::Roles(ADMIN_ONLY) },
    Route { path: "/teacher", title: "Espace enseignant", access: Access::Roles(TEACHER_ONLY) },
    Route { path: "/student", title: "Espace étudiant", access: Access::Roles(STUDENT_ONLY) },
    Route { path: "/vie-etudiante", title: "Vie Étudiante", access: Access::Roles(STUDENT_ONLY) },
];

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const HOME_PATH: &str = "/";

/// Why the guard refused to render a path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteDenied {
    #[error("'{path}' requires a signed-in user")]
    Unauthenticated { path: String },

    #[error("role '{role}' may not open '{path}'")]
    Forbidden { path: String, role: Role },

    #[error("no route matches '{path}'")]
    UnknownRoute { path: String },
}

impl RouteDenied {
    /// Where the viewer is sent instead.
    pub fn redirect_to(&self) -> &'static str {
        match self {
            RouteDenied::Unauthenticated { .. } => LOGIN_PATH,
            RouteDenied::Forbidden { .. } => DASHBOARD_PATH,
            RouteDenied::UnknownRoute { .. } => HOME_PATH,
        }
    }
}

/// Strip query/fragment and trailing slashes.
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { HOME_PATH } else { trimmed }
}

fn covers(route: &str, path: &str) -> bool {
    if route == HOME_PATH {
        return path == HOME_PATH;
    }
    path == route
        || path
            .strip_prefix(route)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Find the route owning a path (longest matching prefix).
pub fn match_route(path: &str) -> Option<&'static Route> {
    let path = normalize(path);
    ROUTES
        .iter()
        .filter(|route| covers(route.path, path))
        .max_by_key(|route| route.path.len())
}

/// Whether a signed-in user with `role` may open `path`.
pub fn is_allowed(role: Role, path: &str) -> bool {
    match_route(path).is_some_and(|route| route.access.permits(Some(role)))
}

/// Route prefixes a role may open (its static access table).
pub fn allowed_routes(role: Role) -> impl Iterator<Item = &'static Route> {
    ROUTES
        .iter()
        .filter(move |route| route.access.permits(Some(role)))
}

/// The route guard.
///
/// - No IO
/// - No panics
/// - Anonymous viewers are sent to `/login`, wrong roles to `/dashboard`,
///   unknown paths to `/`.
pub fn authorize_route(role: Option<Role>, path: &str) -> Result<&'static Route, RouteDenied> {
    let Some(route) = match_route(path) else {
        return Err(RouteDenied::UnknownRoute {
            path: path.to_string(),
        });
    };

    if route.access.permits(role) {
        return Ok(route);
    }

    match role {
        None => Err(RouteDenied::Unauthenticated {
            path: path.to_string(),
        }),
        Some(role) => Err(RouteDenied::Forbidden {
            path: path.to_string(),
            role,
        }),
    }
}
