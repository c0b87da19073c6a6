use crate::{Event, FieldUpdate};

/// Host form seam: field write-back and re-render.
///
/// `set_field` applies one write to the form state and returns the triggers a
/// real form would fire in response (e.g. the `ledger_amount` change handler
/// bound to the row). The dispatcher feeds those back through its guard.
pub trait FormHost<S> {
    type Event: Event;

    fn set_field(&mut self, state: &mut S, update: &FieldUpdate) -> Vec<Self::Event>;

    /// Re-render signal for a table/field after a programmatic change.
    fn refresh_field(&mut self, state: &S, field: &str);
}
