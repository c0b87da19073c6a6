//! Per-kind form behaviour.
//!
//! Contra and Journal vouchers historically balanced differently (last row of
//! the short side vs. first empty row; immediate vs. debounced entry-type
//! trigger). Each kind gets its own profile; deployments may override it
//! through the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::balancer::BalancePolicy;
use crate::voucher::VoucherKind;

pub const POLICY_ENV: &str = "TALLYERP_BALANCE_POLICY";
pub const TYPE_CHANGE_DELAY_ENV: &str = "TALLYERP_TYPE_CHANGE_DELAY_MS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown balance policy {0:?} (expected last-of-side or first-empty)")]
    UnknownPolicy(String),

    #[error("invalid type-change delay {0:?} (expected milliseconds)")]
    InvalidDelay(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProfile {
    pub policy: BalancePolicy,
    /// Debounce for the entry-type trigger; zero dispatches immediately.
    pub type_change_delay_ms: u64,
    pub balance_on_row_add: bool,
    /// Run a best-effort balancing pass before save-time validation.
    pub balance_before_validate: bool,
}

impl FormProfile {
    pub fn for_kind(kind: VoucherKind) -> Self {
        match kind {
            VoucherKind::Contra => Self {
                policy: BalancePolicy::LastOfSide,
                type_change_delay_ms: 0,
                balance_on_row_add: false,
                balance_before_validate: false,
            },
            VoucherKind::Journal | VoucherKind::Payment => Self {
                policy: BalancePolicy::FirstEmpty,
                type_change_delay_ms: 10,
                balance_on_row_add: true,
                balance_before_validate: true,
            },
        }
    }

    /// Kind defaults with [`POLICY_ENV`] / [`TYPE_CHANGE_DELAY_ENV`] applied.
    pub fn from_env(kind: VoucherKind) -> Result<Self, ConfigError> {
        let policy = std::env::var(POLICY_ENV).ok();
        let delay = std::env::var(TYPE_CHANGE_DELAY_ENV).ok();
        Self::for_kind(kind).with_overrides(policy.as_deref(), delay.as_deref())
    }

    pub fn with_overrides(
        mut self,
        policy: Option<&str>,
        type_change_delay_ms: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = policy.filter(|s| !s.trim().is_empty()) {
            self.policy = raw.parse()?;
        }
        if let Some(raw) = type_change_delay_ms.filter(|s| !s.trim().is_empty()) {
            self.type_change_delay_ms = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidDelay(raw.to_string()))?;
        }
        Ok(self)
    }

    pub fn type_change_delay(&self) -> Duration {
        Duration::from_millis(self.type_change_delay_ms)
    }
}
