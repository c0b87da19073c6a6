//! Save-time validation.
//!
//! Independent of the balancer: validation never assumes a balancing pass has
//! run. Rows are checked in order and the first failure wins; the imbalance
//! check only runs once every row is individually valid.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tallyerp_core::DomainError;

use crate::amount::Amount;
use crate::balancer::Totals;
use crate::voucher::{ENTRY_TYPE_FIELD, LEDGER_FIELD, LedgerEntry, Voucher, VoucherKind};

/// Ledger groups whose members count as cash or bank.
pub const CASH_OR_BANK_GROUPS: [&str; 2] = ["Cash-in-Hand", "Bank Accounts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Ledger,
    EntryType,
}

impl RequiredField {
    pub fn fieldname(&self) -> &'static str {
        match self {
            RequiredField::Ledger => LEDGER_FIELD,
            RequiredField::EntryType => ENTRY_TYPE_FIELD,
        }
    }
}

impl core::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RequiredField::Ledger => f.write_str("Ledger"),
            RequiredField::EntryType => f.write_str("Entry Type"),
        }
    }
}

/// Why a voucher cannot be saved. `row` is the 1-based row number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoucherError {
    #[error("{field} is mandatory (row {row})")]
    MissingRequiredField { row: usize, field: RequiredField },

    #[error("Ledger Amount must be greater than zero (row {row})")]
    InvalidAmount { row: usize },

    #[error("Debit ({debit}) and Credit ({credit}) must be equal")]
    Imbalance { debit: Amount, credit: Amount },

    #[error("Debit and Credit totals are too large")]
    TotalsOverflow,

    #[error("{kind} must have at least two ledger entries")]
    TooFewEntries { kind: VoucherKind },

    #[error("{ledger} is not allowed in {kind}")]
    LedgerNotAllowed { ledger: String, kind: VoucherKind },

    #[error("{kind} must contain at least one Cash-in-Hand or Bank Accounts ledger")]
    MissingCashOrBank { kind: VoucherKind },

    #[error("Date and Ledger Entries are mandatory")]
    MissingDateOrEntries { kind: VoucherKind },
}

impl From<VoucherError> for DomainError {
    fn from(value: VoucherError) -> Self {
        DomainError::validation(value.to_string())
    }
}

/// Lookup of a ledger's parent group (e.g. "Bank Accounts").
pub trait LedgerDirectory {
    fn parent_group(&self, ledger: &str) -> Option<String>;

    fn is_cash_or_bank(&self, ledger: &str) -> bool {
        self.parent_group(ledger)
            .is_some_and(|group| CASH_OR_BANK_GROUPS.contains(&group.as_str()))
    }
}

/// Ledger name → parent group, loaded up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryLedgerDirectory {
    groups: HashMap<String, String>,
}

impl InMemoryLedgerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ledger: impl Into<String>, group: impl Into<String>) -> Self {
        self.insert(ledger, group);
        self
    }

    pub fn insert(&mut self, ledger: impl Into<String>, group: impl Into<String>) {
        self.groups.insert(ledger.into(), group.into());
    }
}

impl LedgerDirectory for InMemoryLedgerDirectory {
    fn parent_group(&self, ledger: &str) -> Option<String> {
        self.groups.get(ledger).cloned()
    }
}

fn check_row(row: usize, entry: &LedgerEntry) -> Result<(), VoucherError> {
    if entry.ledger.trim().is_empty() {
        return Err(VoucherError::MissingRequiredField {
            row,
            field: RequiredField::Ledger,
        });
    }
    if entry.entry_type.is_none() {
        return Err(VoucherError::MissingRequiredField {
            row,
            field: RequiredField::EntryType,
        });
    }
    if entry.is_fillable() {
        return Err(VoucherError::InvalidAmount { row });
    }
    Ok(())
}

fn check_totals(entries: &[LedgerEntry]) -> Result<Totals, VoucherError> {
    let totals = Totals::of(entries).map_err(|_| VoucherError::TotalsOverflow)?;
    if !totals.is_balanced() {
        return Err(VoucherError::Imbalance {
            debit: totals.debit,
            credit: totals.credit,
        });
    }
    Ok(totals)
}

/// Form-side gate run on every save attempt.
pub fn validate_entries(entries: &[LedgerEntry]) -> Result<Totals, VoucherError> {
    for (idx, entry) in entries.iter().enumerate() {
        check_row(idx + 1, entry)?;
    }
    check_totals(entries)
}

/// Document-level rules on top of [`validate_entries`]: row count, which
/// ledgers a voucher kind may use, and the Payment date.
pub fn validate_for_save(
    voucher: &Voucher,
    directory: &dyn LedgerDirectory,
) -> Result<Totals, VoucherError> {
    let entries = voucher.entries();

    if matches!(voucher.kind, VoucherKind::Contra | VoucherKind::Journal) && entries.len() < 2 {
        return Err(VoucherError::TooFewEntries { kind: voucher.kind });
    }

    if voucher.kind == VoucherKind::Payment
        && !entries.iter().any(|e| directory.is_cash_or_bank(&e.ledger))
    {
        return Err(VoucherError::MissingCashOrBank { kind: voucher.kind });
    }

    let missing_date_or_entries = voucher.date.is_none() || entries.is_empty();
    if voucher.kind == VoucherKind::Payment && missing_date_or_entries {
        return Err(VoucherError::MissingDateOrEntries { kind: voucher.kind });
    }

    for (idx, entry) in entries.iter().enumerate() {
        check_row(idx + 1, entry)?;

        if voucher.kind == VoucherKind::Contra && !directory.is_cash_or_bank(&entry.ledger) {
            return Err(VoucherError::LedgerNotAllowed {
                ledger: entry.ledger.clone(),
                kind: voucher.kind,
            });
        }
    }

    let totals = check_totals(entries).inspect_err(|err| {
        tracing::debug!(kind = %voucher.kind, error = %err, "voucher rejected");
    })?;
    Ok(totals)
}
