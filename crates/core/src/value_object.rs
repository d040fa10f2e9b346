//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one, build a
/// new instance and reassign it; the owning entity never mutates it in place.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Address { city: String, detail: String }
///
/// impl ValueObject for Address {}
///
/// let moved = address.change_detail_to("No. 8 Main St");
/// assert_ne!(moved, address);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
