//! `voucher-check <voucher.json> [ledger-groups.json]`
//!
//! Loads a voucher as the form would hold it, runs the save path (balancing
//! pre-pass per the kind's profile, then validation) and prints the outcome as
//! JSON. With a ledger-groups file (`{"Cash": "Cash-in-Hand", ...}`) the
//! document-level rules run too. Exits non-zero when the voucher is rejected.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use serde::Serialize;

use tallyerp_accounting::{
    Amount, FormProfile, InMemoryFormHost, InMemoryLedgerDirectory, Voucher, VoucherForm,
    validate_for_save,
};

#[derive(Debug, Serialize)]
struct Report<'a> {
    voucher: &'a str,
    kind: &'a str,
    policy: &'a str,
    filled: usize,
    debit: Option<Amount>,
    credit: Option<Amount>,
    error: Option<String>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn run() -> anyhow::Result<bool> {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let Some(voucher_path) = args.next() else {
        bail!("usage: voucher-check <voucher.json> [ledger-groups.json]");
    };
    let directory: Option<InMemoryLedgerDirectory> =
        args.next().map(|p| read_json(&p)).transpose()?;

    let voucher: Voucher = read_json(&voucher_path)?;
    let profile = FormProfile::from_env(voucher.kind)?;
    tracing::info!(
        path = %voucher_path.display(),
        kind = %voucher.kind,
        rows = voucher.entries().len(),
        policy = profile.policy.as_str(),
        "checking voucher"
    );

    let mut form = VoucherForm::with_profile(voucher, profile, InMemoryFormHost::new());
    let outcome = form.validate();
    let filled = form.host().writes().len();
    let voucher = form.into_voucher();

    let outcome = match &directory {
        Some(directory) => outcome.and_then(|_| validate_for_save(&voucher, directory)),
        None => outcome,
    };

    let name = voucher.name.to_string();
    let report = Report {
        voucher: voucher.voucher_number.as_deref().unwrap_or(&name),
        kind: voucher.kind.doctype(),
        policy: profile.policy.as_str(),
        filled,
        debit: outcome.as_ref().ok().map(|t| t.debit),
        credit: outcome.as_ref().ok().map(|t| t.credit),
        error: outcome.as_ref().err().map(ToString::to_string),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(outcome.is_ok())
}

fn main() -> ExitCode {
    tallyerp_observability::init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "voucher-check failed");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
