use tallyerp_core::RowId;
use tallyerp_events::Event;

/// Triggers a voucher form fires on its ledger-entry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoucherEvent {
    AmountChanged { row: RowId },
    EntryTypeChanged { row: RowId },
    RowAdded { row: RowId },
    RowRemoved,
    /// Best-effort balancing pass before save-time validation.
    Validate,
}

impl VoucherEvent {
    /// Row the trigger fired for, if any.
    pub fn row(&self) -> Option<RowId> {
        match self {
            VoucherEvent::AmountChanged { row }
            | VoucherEvent::EntryTypeChanged { row }
            | VoucherEvent::RowAdded { row } => Some(*row),
            VoucherEvent::RowRemoved | VoucherEvent::Validate => None,
        }
    }
}

impl Event for VoucherEvent {
    fn event_type(&self) -> &'static str {
        match self {
            VoucherEvent::AmountChanged { .. } => "voucher.entry.amount_changed",
            VoucherEvent::EntryTypeChanged { .. } => "voucher.entry.entry_type_changed",
            VoucherEvent::RowAdded { .. } => "voucher.entry.added",
            VoucherEvent::RowRemoved => "voucher.entry.removed",
            VoucherEvent::Validate => "voucher.validate",
        }
    }
}
