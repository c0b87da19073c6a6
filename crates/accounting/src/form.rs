//! Voucher form: triggers wired to the balancer.
//!
//! `on_*` methods are the bound trigger handlers; they assume the host has
//! already applied the user's edit. The `edit_*` / `add_row` / `remove_row`
//! helpers apply the edit to the voucher first and then fire the trigger,
//! the way the browser form does for a real user.

use std::time::Instant;

use tallyerp_core::{DomainResult, RowId};
use tallyerp_events::{DispatchReport, Dispatcher, FormHost};

use crate::amount::Amount;
use crate::balancer::{Balancer, Totals};
use crate::config::FormProfile;
use crate::trigger::VoucherEvent;
use crate::validation::{VoucherError, validate_entries};
use crate::voucher::{EntryType, LedgerEntry, Voucher};

/// One open voucher with its own re-entrancy guard and trigger queue.
#[derive(Debug)]
pub struct VoucherForm<H> {
    voucher: Voucher,
    profile: FormProfile,
    dispatcher: Dispatcher<Balancer>,
    host: H,
}

impl<H> VoucherForm<H>
where
    H: FormHost<Voucher, Event = VoucherEvent>,
{
    /// Open a form with the default profile for the voucher's kind.
    pub fn new(voucher: Voucher, host: H) -> Self {
        let profile = FormProfile::for_kind(voucher.kind);
        Self::with_profile(voucher, profile, host)
    }

    pub fn with_profile(voucher: Voucher, profile: FormProfile, host: H) -> Self {
        Self {
            voucher,
            profile,
            dispatcher: Dispatcher::new(Balancer::new(profile.policy)),
            host,
        }
    }

    pub fn voucher(&self) -> &Voucher {
        &self.voucher
    }

    pub fn profile(&self) -> &FormProfile {
        &self.profile
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_voucher(self) -> Voucher {
        self.voucher
    }

    /// Deferred entry-type triggers not yet flushed by [`Self::poll`].
    pub fn pending(&self) -> usize {
        self.dispatcher.pending()
    }

    fn dispatch(&mut self, event: VoucherEvent) -> DispatchReport {
        self.dispatcher.dispatch(&mut self.voucher, &mut self.host, &event)
    }

    pub fn on_amount_changed(&mut self, row: RowId) -> DispatchReport {
        self.dispatch(VoucherEvent::AmountChanged { row })
    }

    /// Debounced when the profile has a type-change delay; the pass then runs
    /// from [`Self::poll`].
    pub fn on_entry_type_changed(&mut self, row: RowId, now: Instant) -> DispatchReport {
        let event = VoucherEvent::EntryTypeChanged { row };
        let delay = self.profile.type_change_delay();
        if delay.is_zero() {
            return self.dispatch(event);
        }
        self.dispatcher.dispatch_after(event, delay, now);
        DispatchReport::default()
    }

    pub fn on_row_added(&mut self, row: RowId) -> DispatchReport {
        if !self.profile.balance_on_row_add {
            return DispatchReport::default();
        }
        self.dispatch(VoucherEvent::RowAdded { row })
    }

    pub fn on_row_removed(&mut self) -> DispatchReport {
        self.dispatch(VoucherEvent::RowRemoved)
    }

    /// Flush deferred triggers due at `now`.
    pub fn poll(&mut self, now: Instant) -> DispatchReport {
        self.dispatcher.poll(&mut self.voucher, &mut self.host, now)
    }

    pub fn edit_amount(
        &mut self,
        row: RowId,
        amount: Option<Amount>,
    ) -> DomainResult<DispatchReport> {
        self.voucher.entry_mut(row)?.ledger_amount = amount;
        Ok(self.on_amount_changed(row))
    }

    pub fn edit_entry_type(
        &mut self,
        row: RowId,
        entry_type: Option<EntryType>,
        now: Instant,
    ) -> DomainResult<DispatchReport> {
        self.voucher.entry_mut(row)?.entry_type = entry_type;
        Ok(self.on_entry_type_changed(row, now))
    }

    pub fn add_row(&mut self, entry: LedgerEntry) -> (RowId, DispatchReport) {
        let row = self.voucher.push_entry(entry);
        (row, self.on_row_added(row))
    }

    pub fn remove_row(&mut self, row: RowId) -> DomainResult<DispatchReport> {
        self.voucher.remove_entry(row)?;
        Ok(self.on_row_removed())
    }

    /// Save-time gate.
    ///
    /// Runs the balancing pre-pass first when the profile asks for it, but the
    /// checks themselves never rely on it.
    pub fn validate(&mut self) -> Result<Totals, VoucherError> {
        if self.profile.balance_before_validate && !self.voucher.entries().is_empty() {
            self.dispatch(VoucherEvent::Validate);
        }
        validate_entries(self.voucher.entries()).inspect_err(|err| {
            tracing::debug!(kind = %self.voucher.kind, error = %err, "voucher rejected");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryFormHost;
    use crate::voucher::VoucherKind;
    use std::time::Duration;

    fn amt(units: u64) -> Option<Amount> {
        Some(Amount::from_units(units))
    }

    #[test]
    fn amount_edit_fills_the_empty_credit_once() {
        let mut voucher = Voucher::new(VoucherKind::Contra);
        let debit = voucher.push_entry(LedgerEntry::debit("HDFC Bank", None));
        voucher.push_entry(LedgerEntry::credit("Cash", None));
        let mut form = VoucherForm::new(voucher, InMemoryFormHost::new());

        let report = form.edit_amount(debit, amt(100)).unwrap();

        assert_eq!(form.voucher().entries[1].ledger_amount, amt(100));
        assert_eq!(report.passes, 1);
        assert_eq!(report.applied, 1);
        assert_eq!(report.suppressed, 1);
        assert_eq!(form.host().writes().len(), 1);
    }

    #[test]
    fn contra_does_not_balance_on_row_add() {
        let voucher = Voucher::with_entries(
            VoucherKind::Contra,
            vec![LedgerEntry::debit("Bank", amt(50))],
        );
        let mut form = VoucherForm::new(voucher, InMemoryFormHost::new());

        let (_, report) = form.add_row(LedgerEntry::credit("Cash", None));

        assert_eq!(report, DispatchReport::default());
        assert!(form.voucher().entries[1].ledger_amount.is_none());
    }

    #[test]
    fn journal_balances_on_row_add() {
        let voucher = Voucher::with_entries(
            VoucherKind::Journal,
            vec![LedgerEntry::debit("Rent", amt(50))],
        );
        let mut form = VoucherForm::new(voucher, InMemoryFormHost::new());

        let (row, report) = form.add_row(LedgerEntry::credit("Cash", None));

        assert_eq!(report.applied, 1);
        assert_eq!(form.voucher().entry(row).unwrap().ledger_amount, amt(50));
    }

    #[test]
    fn journal_type_change_waits_for_the_debounce() {
        let voucher = Voucher::with_entries(
            VoucherKind::Journal,
            vec![LedgerEntry::debit("Rent", amt(80)), LedgerEntry::blank()],
        );
        let row = voucher.entries[1].name;
        let mut form = VoucherForm::new(voucher, InMemoryFormHost::new());
        let t0 = Instant::now();

        let report = form.edit_entry_type(row, Some(EntryType::Credit), t0).unwrap();
        assert_eq!(report.passes, 0);
        assert_eq!(form.pending(), 1);
        assert!(form.voucher().entries[1].ledger_amount.is_none());

        form.poll(t0 + Duration::from_millis(9));
        assert!(form.voucher().entries[1].ledger_amount.is_none());

        let report = form.poll(t0 + Duration::from_millis(10));
        assert_eq!(report.applied, 1);
        assert_eq!(form.voucher().entries[1].ledger_amount, amt(80));
        assert_eq!(form.pending(), 0);
    }

    #[test]
    fn contra_type_change_is_immediate() {
        let voucher = Voucher::with_entries(
            VoucherKind::Contra,
            vec![LedgerEntry::credit("Cash", amt(30)), LedgerEntry::blank()],
        );
        let row = voucher.entries[1].name;
        let mut form = VoucherForm::new(voucher, InMemoryFormHost::new());

        let report = form.edit_entry_type(row, Some(EntryType::Debit), Instant::now()).unwrap();

        assert_eq!(report.applied, 1);
        assert_eq!(form.voucher().entries[1].ledger_amount, amt(30));
    }

    #[test]
    fn journal_validate_runs_the_pre_pass() {
        let voucher = Voucher::with_entries(
            VoucherKind::Journal,
            vec![LedgerEntry::debit("Rent", amt(120)), LedgerEntry::credit("Cash", None)],
        );
        let mut form = VoucherForm::new(voucher, InMemoryFormHost::new());

        let totals = form.validate().unwrap();
        assert_eq!(totals.credit, Amount::from_units(120));
    }

    #[test]
    fn contra_validate_does_not_balance() {
        let voucher = Voucher::with_entries(
            VoucherKind::Contra,
            vec![LedgerEntry::debit("Bank", amt(120)), LedgerEntry::credit("Cash", None)],
        );
        let mut form = VoucherForm::new(voucher, InMemoryFormHost::new());

        assert_eq!(form.validate(), Err(VoucherError::InvalidAmount { row: 2 }));
        assert!(form.host().writes().is_empty());
    }

    #[test]
    fn unknown_rows_are_not_found() {
        let voucher = Voucher::new(VoucherKind::Journal);
        let mut form = VoucherForm::new(voucher, InMemoryFormHost::new());
        assert!(form.edit_amount(RowId::new(), amt(1)).is_err());
        assert!(form.remove_row(RowId::new()).is_err());
    }
}
