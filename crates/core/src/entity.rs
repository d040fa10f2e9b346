//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities inside an aggregate (e.g. order line items) are identified locally,
/// relative to their root.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
