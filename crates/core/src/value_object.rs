//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Two amounts of `100.00` are the same amount no matter which row holds them.
/// Value objects are immutable; "changing" one means replacing it.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Amount(Decimal);
///
/// impl ValueObject for Amount {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
