/// A domain-agnostic form trigger.
///
/// Triggers are facts about what the user (or the host) just did to a form:
/// an amount was edited, a row was removed, the document is being saved.
pub trait Event: Clone + core::fmt::Debug + 'static {
    /// Stable trigger name (e.g. "voucher.entry.amount_changed").
    fn event_type(&self) -> &'static str;
}
