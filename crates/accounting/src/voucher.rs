use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tallyerp_core::{DomainError, DomainResult, Entity, RowId, VoucherId};

use crate::amount::Amount;

/// Child doctype of every voucher's ledger rows.
pub const LEDGER_ENTRY_DOCTYPE: &str = "Voucher Ledger Entry";
/// Table field holding the ledger rows on the parent voucher.
pub const ENTRIES_FIELD: &str = "voucher_ledger_entry";
pub const LEDGER_FIELD: &str = "ledger";
pub const ENTRY_TYPE_FIELD: &str = "entry_type";
pub const AMOUNT_FIELD: &str = "ledger_amount";

/// Side of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Debit,
    Credit,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Debit => "Debit",
            EntryType::Credit => "Credit",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            EntryType::Debit => EntryType::Credit,
            EntryType::Credit => EntryType::Debit,
        }
    }
}

impl core::fmt::Display for EntryType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voucher document kinds carrying a ledger-entry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoucherKind {
    Contra,
    Journal,
    Payment,
}

impl VoucherKind {
    pub fn doctype(&self) -> &'static str {
        match self {
            VoucherKind::Contra => "Contra Voucher",
            VoucherKind::Journal => "Journal Voucher",
            VoucherKind::Payment => "Payment Voucher",
        }
    }
}

impl core::fmt::Display for VoucherKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.doctype())
    }
}

/// One debit or credit line.
///
/// Fields are optional because the row is edited in place: a freshly added
/// row has no ledger, no side and no amount yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(default)]
    pub name: RowId,
    #[serde(default)]
    pub ledger: String,
    #[serde(default)]
    pub entry_type: Option<EntryType>,
    #[serde(default)]
    pub ledger_amount: Option<Amount>,
}

impl LedgerEntry {
    /// A blank row, as the form adds it.
    pub fn blank() -> Self {
        Self {
            name: RowId::new(),
            ledger: String::new(),
            entry_type: None,
            ledger_amount: None,
        }
    }

    pub fn new(ledger: impl Into<String>, entry_type: EntryType, amount: Option<Amount>) -> Self {
        Self {
            name: RowId::new(),
            ledger: ledger.into(),
            entry_type: Some(entry_type),
            ledger_amount: amount,
        }
    }

    pub fn debit(ledger: impl Into<String>, amount: Option<Amount>) -> Self {
        Self::new(ledger, EntryType::Debit, amount)
    }

    pub fn credit(ledger: impl Into<String>, amount: Option<Amount>) -> Self {
        Self::new(ledger, EntryType::Credit, amount)
    }

    /// Amount with "empty" read as zero.
    pub fn amount_or_zero(&self) -> Amount {
        self.ledger_amount.unwrap_or_default()
    }

    /// Empty or exactly zero: the state the balancer is allowed to fill.
    pub fn is_fillable(&self) -> bool {
        self.ledger_amount.is_none_or(|a| a.is_zero())
    }
}

impl Entity for LedgerEntry {
    type Id = RowId;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}

/// Parent voucher document.
///
/// Entry order is insertion order and matters: balancing policies pick the
/// first or last candidate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    #[serde(default)]
    pub name: VoucherId,
    pub kind: VoucherKind,
    #[serde(default)]
    pub voucher_number: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub narration: Option<String>,
    #[serde(default, rename = "voucher_ledger_entry")]
    pub entries: Vec<LedgerEntry>,
}

impl Voucher {
    pub fn new(kind: VoucherKind) -> Self {
        Self {
            name: VoucherId::new(),
            kind,
            voucher_number: None,
            date: None,
            narration: None,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(kind: VoucherKind, entries: Vec<LedgerEntry>) -> Self {
        Self {
            entries,
            ..Self::new(kind)
        }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn entry(&self, row: RowId) -> DomainResult<&LedgerEntry> {
        self.entries
            .iter()
            .find(|e| e.name == row)
            .ok_or_else(|| DomainError::not_found(format!("ledger row {row}")))
    }

    pub fn entry_mut(&mut self, row: RowId) -> DomainResult<&mut LedgerEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.name == row)
            .ok_or_else(|| DomainError::not_found(format!("ledger row {row}")))
    }

    /// Append a row; returns its identifier.
    pub fn push_entry(&mut self, entry: LedgerEntry) -> RowId {
        let row = entry.name;
        self.entries.push(entry);
        row
    }

    pub fn remove_entry(&mut self, row: RowId) -> DomainResult<LedgerEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.name == row)
            .ok_or_else(|| DomainError::not_found(format!("ledger row {row}")))?;
        Ok(self.entries.remove(idx))
    }
}

impl Entity for Voucher {
    type Id = VoucherId;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}
