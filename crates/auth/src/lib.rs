//! `esst-auth`: session and role-based access control for the ESST portal.
//!
//! This crate is decoupled from rendering. It knows who is signed in and
//! whether a path may render for them.

pub mod directory;
pub mod menu;
pub mod profile;
pub mod role;
pub mod routes;
pub mod session;
pub mod storage;
pub mod user;

pub use directory::{FixedDirectory, UserDirectory};
pub use menu::{MenuEntry, NavLink, is_active, menu_for, navigation};
pub use profile::{RoleProfile, profile};
pub use role::{Role, UnknownRole};
pub use routes::{Access, Route, RouteDenied, authorize_route, match_route};
pub use session::{DEMO_PASSWORD, LoginError, Session};
pub use storage::{FileStorage, MemoryStorage, SESSION_KEY, SessionStorage, StorageError};
pub use user::User;
