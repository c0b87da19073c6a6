//! In-process form host.
//!
//! Applies field writes straight to a [`Voucher`] and echoes the triggers a
//! browser form would fire for the written field. Used by the CLI and tests;
//! a UI embedding provides its own [`FormHost`].

use tallyerp_events::{FieldUpdate, FormHost};

use crate::amount::Amount;
use crate::trigger::VoucherEvent;
use crate::voucher::{AMOUNT_FIELD, ENTRY_TYPE_FIELD, EntryType, LEDGER_FIELD, Voucher};

#[derive(Debug, Default)]
pub struct InMemoryFormHost {
    writes: Vec<FieldUpdate>,
    refreshes: Vec<String>,
}

impl InMemoryFormHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write applied so far, in order.
    pub fn writes(&self) -> &[FieldUpdate] {
        &self.writes
    }

    /// Fields re-rendered so far, in order.
    pub fn refreshes(&self) -> &[String] {
        &self.refreshes
    }
}

impl FormHost<Voucher> for InMemoryFormHost {
    type Event = VoucherEvent;

    fn set_field(&mut self, voucher: &mut Voucher, update: &FieldUpdate) -> Vec<VoucherEvent> {
        let row = update.name;
        let Ok(entry) = voucher.entry_mut(row) else {
            tracing::warn!(%row, field = %update.field, "write to unknown ledger row ignored");
            return Vec::new();
        };

        match update.field.as_str() {
            AMOUNT_FIELD => match Amount::from_field(&update.value) {
                Ok(amount) => {
                    entry.ledger_amount = amount;
                    self.writes.push(update.clone());
                    vec![VoucherEvent::AmountChanged { row }]
                }
                Err(err) => {
                    tracing::warn!(%row, error = %err, "rejected ledger amount write");
                    Vec::new()
                }
            },
            ENTRY_TYPE_FIELD => match serde_json::from_value::<Option<EntryType>>(
                update.value.clone(),
            ) {
                Ok(entry_type) => {
                    entry.entry_type = entry_type;
                    self.writes.push(update.clone());
                    vec![VoucherEvent::EntryTypeChanged { row }]
                }
                Err(err) => {
                    tracing::warn!(%row, error = %err, "rejected entry type write");
                    Vec::new()
                }
            },
            LEDGER_FIELD => match update.value.as_str() {
                Some(ledger) => {
                    entry.ledger = ledger.to_string();
                    self.writes.push(update.clone());
                    Vec::new()
                }
                None => {
                    tracing::warn!(%row, value = %update.value, "rejected ledger write");
                    Vec::new()
                }
            },
            other => {
                tracing::warn!(%row, field = other, "write to unknown field ignored");
                Vec::new()
            }
        }
    }

    fn refresh_field(&mut self, _voucher: &Voucher, field: &str) {
        tracing::trace!(field, "refresh");
        self.refreshes.push(field.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voucher::{LEDGER_ENTRY_DOCTYPE, LedgerEntry, VoucherKind};
    use serde_json::json;

    #[test]
    fn amount_write_echoes_the_change_trigger() {
        let mut voucher = Voucher::new(VoucherKind::Journal);
        let row = voucher.push_entry(LedgerEntry::credit("Cash", None));
        let mut host = InMemoryFormHost::new();

        let echoes = host.set_field(
            &mut voucher,
            &FieldUpdate::new(LEDGER_ENTRY_DOCTYPE, row, AMOUNT_FIELD, json!("60")),
        );

        assert_eq!(echoes, vec![VoucherEvent::AmountChanged { row }]);
        assert_eq!(voucher.entries[0].ledger_amount, Some(Amount::from_units(60)));
        assert_eq!(host.writes().len(), 1);
    }

    #[test]
    fn entry_type_write_echoes_its_trigger() {
        let mut voucher = Voucher::new(VoucherKind::Journal);
        let row = voucher.push_entry(LedgerEntry::blank());
        let mut host = InMemoryFormHost::new();

        let echoes = host.set_field(
            &mut voucher,
            &FieldUpdate::new(LEDGER_ENTRY_DOCTYPE, row, ENTRY_TYPE_FIELD, json!("Credit")),
        );

        assert_eq!(echoes, vec![VoucherEvent::EntryTypeChanged { row }]);
        assert_eq!(voucher.entries[0].entry_type, Some(EntryType::Credit));
    }

    #[test]
    fn bad_writes_are_dropped() {
        let mut voucher = Voucher::new(VoucherKind::Journal);
        let row = voucher.push_entry(LedgerEntry::credit("Cash", None));
        let mut host = InMemoryFormHost::new();

        let echoes = host.set_field(
            &mut voucher,
            &FieldUpdate::new(LEDGER_ENTRY_DOCTYPE, row, AMOUNT_FIELD, json!("-3")),
        );
        assert!(echoes.is_empty());
        assert!(voucher.entries[0].ledger_amount.is_none());

        let echoes = host.set_field(
            &mut voucher,
            &FieldUpdate::new(
                LEDGER_ENTRY_DOCTYPE,
                tallyerp_core::RowId::new(),
                AMOUNT_FIELD,
                json!("3"),
            ),
        );
        assert!(echoes.is_empty());
        assert!(host.writes().is_empty());
    }

    #[test]
    fn ledger_writes_must_be_names() {
        let mut voucher = Voucher::new(VoucherKind::Contra);
        let row = voucher.push_entry(LedgerEntry::credit("Cash", None));
        let mut host = InMemoryFormHost::new();

        let echoes = host.set_field(
            &mut voucher,
            &FieldUpdate::new(LEDGER_ENTRY_DOCTYPE, row, LEDGER_FIELD, json!(42)),
        );
        assert!(echoes.is_empty());
        assert_eq!(voucher.entries[0].ledger, "Cash");
        assert!(host.writes().is_empty());

        host.set_field(
            &mut voucher,
            &FieldUpdate::new(LEDGER_ENTRY_DOCTYPE, row, LEDGER_FIELD, json!("HDFC Bank")),
        );
        assert_eq!(voucher.entries[0].ledger, "HDFC Bank");
        assert_eq!(host.writes().len(), 1);
    }
}
