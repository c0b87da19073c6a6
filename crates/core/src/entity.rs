//! Entity trait: identity that survives field edits.

/// Entity marker + minimal interface.
///
/// A ledger row keeps its identifier while its ledger, entry type and amount
/// are edited; the host write primitive addresses rows by this identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
