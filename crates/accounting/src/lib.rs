//! Voucher accounting (double-entry ledger rows, auto-balancing, validation).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod amount;
pub mod balancer;
pub mod config;
pub mod form;
pub mod host;
pub mod trigger;
pub mod validation;
pub mod voucher;

pub use amount::{Amount, AmountError};
pub use balancer::{AmountFill, BalancePolicy, Balancer, Totals};
pub use config::{ConfigError, FormProfile};
pub use form::VoucherForm;
pub use host::InMemoryFormHost;
pub use trigger::VoucherEvent;
pub use validation::{
    InMemoryLedgerDirectory, LedgerDirectory, RequiredField, VoucherError, validate_entries,
    validate_for_save,
};
pub use voucher::{EntryType, LedgerEntry, Voucher, VoucherKind};
