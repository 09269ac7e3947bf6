//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Find an entity by id in a slice.
pub fn find<E: Entity>(items: &[E], id: E::Id) -> Option<&E> {
    items.iter().find(|item| item.id() == id)
}

/// Mutable variant of [`find`].
pub fn find_mut<E: Entity>(items: &mut [E], id: E::Id) -> Option<&mut E> {
    items.iter_mut().find(|item| item.id() == id)
}
