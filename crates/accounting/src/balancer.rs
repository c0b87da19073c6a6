//! Auto-balancing of a voucher's ledger rows.
//!
//! The balancer is a pure function of the full, current entry list: it does
//! not care which row was just edited, added or removed. When debits and
//! credits differ it proposes filling exactly one empty (or zero) row on the
//! short side with the difference. If no row qualifies it does nothing and
//! leaves the imbalance for save-time validation to reject.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use tallyerp_core::RowId;
use tallyerp_events::{Effect, EventHandler, FieldUpdate};

use crate::amount::{Amount, AmountError};
use crate::config::ConfigError;
use crate::trigger::VoucherEvent;
use crate::voucher::{
    AMOUNT_FIELD, ENTRIES_FIELD, EntryType, LEDGER_ENTRY_DOCTYPE, LedgerEntry, Voucher,
};

/// Which row on the short side receives the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalancePolicy {
    /// Only the last row of the short side, and only if it is empty.
    LastOfSide,
    /// The first empty row of the short side.
    FirstEmpty,
}

impl BalancePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalancePolicy::LastOfSide => "last-of-side",
            BalancePolicy::FirstEmpty => "first-empty",
        }
    }
}

impl FromStr for BalancePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last-of-side" => Ok(BalancePolicy::LastOfSide),
            "first-empty" => Ok(BalancePolicy::FirstEmpty),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Debit and credit sums of a set of rows.
///
/// Rows without an entry type count on neither side; empty amounts count as
/// zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub debit: Amount,
    pub credit: Amount,
}

impl Totals {
    /// Sum both sides; fails only when a side exceeds the `Decimal` range.
    pub fn of(entries: &[LedgerEntry]) -> Result<Self, AmountError> {
        let mut totals = Totals::default();
        for entry in entries {
            let side = match entry.entry_type {
                Some(EntryType::Debit) => &mut totals.debit,
                Some(EntryType::Credit) => &mut totals.credit,
                None => continue,
            };
            *side = side
                .checked_add(entry.amount_or_zero())
                .ok_or(AmountError::Overflow)?;
        }
        Ok(totals)
    }

    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// The side that is short, and by how much.
    pub fn shortfall(&self) -> Option<(EntryType, Amount)> {
        if let Some(diff) = self.debit.excess_over(self.credit) {
            return Some((EntryType::Credit, diff));
        }
        self.credit
            .excess_over(self.debit)
            .map(|diff| (EntryType::Debit, diff))
    }
}

/// A proposed write: set `row`'s amount to `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmountFill {
    pub row: RowId,
    pub entry_type: EntryType,
    pub amount: Amount,
}

impl AmountFill {
    pub fn to_update(&self) -> FieldUpdate {
        FieldUpdate::new(LEDGER_ENTRY_DOCTYPE, self.row, AMOUNT_FIELD, self.amount.to_field())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balancer {
    policy: BalancePolicy,
}

impl Balancer {
    pub fn new(policy: BalancePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> BalancePolicy {
        self.policy
    }

    /// Decide which row (if any) to fill. Never mutates.
    ///
    /// Totals past the `Decimal` range plan nothing; validation rejects them.
    pub fn plan(&self, entries: &[LedgerEntry]) -> Option<AmountFill> {
        let (short_side, diff) = Totals::of(entries).ok()?.shortfall()?;
        let mut side = entries
            .iter()
            .filter(|e| e.entry_type == Some(short_side));

        let candidate = match self.policy {
            BalancePolicy::LastOfSide => side.last().filter(|e| e.is_fillable()),
            BalancePolicy::FirstEmpty => side.find(|e| e.is_fillable()),
        }?;

        Some(AmountFill {
            row: candidate.name,
            entry_type: short_side,
            amount: diff,
        })
    }

    /// Plan and write directly, without a host form in between.
    pub fn apply(&self, entries: &mut [LedgerEntry]) -> Option<AmountFill> {
        let fill = self.plan(entries)?;
        if let Some(entry) = entries.iter_mut().find(|e| e.name == fill.row) {
            entry.ledger_amount = Some(fill.amount);
        }
        Some(fill)
    }
}

impl EventHandler for Balancer {
    type State = Voucher;
    type Event = VoucherEvent;

    fn handle(&self, voucher: &Voucher, event: &VoucherEvent) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);

        match self.plan(voucher.entries()) {
            Some(fill) => {
                tracing::debug!(
                    kind = %voucher.kind,
                    trigger = ?event,
                    row = %fill.row,
                    side = %fill.entry_type,
                    amount = %fill.amount,
                    "auto-balancing row"
                );
                effects.push(Effect::SetField(fill.to_update()));
            }
            None => match Totals::of(voucher.entries()) {
                Ok(totals) if !totals.is_balanced() => {
                    tracing::debug!(
                        kind = %voucher.kind,
                        policy = self.policy.as_str(),
                        debit = %totals.debit,
                        credit = %totals.credit,
                        "unbalanced but no fillable row"
                    );
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(
                        kind = %voucher.kind,
                        error = %err,
                        "totals not computable"
                    );
                }
            },
        }

        effects.push(Effect::refresh(ENTRIES_FIELD));
        effects
    }
}
