//! Fixed user table consulted at login.

use esst_core::{UserId, entity};

use crate::{Role, User};

pub const ADMIN_ID: UserId = UserId::seeded(1);
pub const DUBOIS_ID: UserId = UserId::seeded(2);
pub const MARTIN_ID: UserId = UserId::seeded(3);
pub const MOREAU_ID: UserId = UserId::seeded(4);
pub const BERNARD_ID: UserId = UserId::seeded(5);

/// Source of known users.
///
/// Implementors only provide the table; lookups are shared.
pub trait UserDirectory {
    fn users(&self) -> &[User];

    /// Exact, case-sensitive email lookup.
    fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users().iter().find(|user| user.email == email)
    }

    fn find(&self, id: UserId) -> Option<&User> {
        entity::find(self.users(), id)
    }

    fn len(&self) -> usize {
        self.users().len()
    }

    fn is_empty(&self) -> bool {
        self.users().is_empty()
    }
}

/// In-memory directory built from a fixed list.
#[derive(Debug, Clone, Default)]
pub struct FixedDirectory {
    users: Vec<User>,
}

impl FixedDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// The ESST demo accounts.
    pub fn seeded() -> Self {
        Self::new(vec![
            User::new(ADMIN_ID, "admin@esst.edu", "Pierre", "Dupont", Role::Admin)
                .with_department("Administration")
                .online(true),
            User::new(DUBOIS_ID, "prof.dubois@esst.edu", "Michel", "Dubois", Role::Teacher)
                .with_department("Informatique")
                .online(true),
            User::new(
                MARTIN_ID,
                "sophie.martin@student.esst.edu",
                "Sophie",
                "Martin",
                Role::Student,
            )
            .with_department("Informatique")
            .online(true),
            User::new(MOREAU_ID, "julien.moreau@esst.edu", "Julien", "Moreau", Role::Teacher)
                .with_department("Sciences"),
            User::new(
                BERNARD_ID,
                "marie.bernard@student.esst.edu",
                "Marie",
                "Bernard",
                Role::Student,
            )
            .with_department("Sciences")
            .online(true),
        ])
    }
}

impl UserDirectory for FixedDirectory {
    fn users(&self) -> &[User] {
        &self.users
    }
}

impl<T: UserDirectory + ?Sized> UserDirectory for &T {
    fn users(&self) -> &[User] {
        (**self).users()
    }
}
