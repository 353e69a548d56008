use crate::{args::StatusArgs, context::Solar};
use anyhow::Result;
use solar_ledger::Ledger;
use std::fmt::Write;

pub fn run(solar: &mut Solar, args: &StatusArgs) -> Result<()> {
    let ledger = solar.ledger()?;
    print!("{}", render(ledger, args.pending));
    Ok(())
}

/// Lists the ledger entries, oldest deployment first.
pub fn render(ledger: &Ledger, pending_only: bool) -> String {
    let records: Vec<_> = ledger
        .sorted_records()
        .into_iter()
        .filter(|record| !(pending_only && record.is_confirmed()))
        .collect();

    if records.is_empty() {
        let what = if pending_only { "pending contracts" } else { "contracts" };
        return format!("No {what} in {}\n", ledger.path().display());
    }

    let mut out = String::new();
    for record in records {
        let mark = if record.is_confirmed() { "\u{2705}" } else { "\u{23f3}" };
        let _ = writeln!(out, "{mark}  {}", record.name());
        if record.deploy_name() != record.name() {
            let _ = writeln!(out, "        deployName: {}", record.deploy_name());
        }
        let _ = writeln!(out, "        txid: {}", record.transaction_id_hex());
        let _ = writeln!(out, "        address: {}", record.address_hex());
        let _ = writeln!(out, "        createdAt: {}", record.created_at().to_rfc3339());
    }
    out
}
