//! `par add`: append a risk record through the mutate-then-refetch cycle.
//!
//! There is deliberately no `--status` flag: created records always start
//! `Open`, and the contract lives in the register rather than the parser.

use clap::Args;

use parapet_core::{RiskDraft, Severity};

use crate::cmd::Session;
use crate::output::{OutputMode, render_item};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Asset at risk.
    #[arg(long)]
    pub asset: String,

    /// Threat against the asset.
    #[arg(long)]
    pub threat: String,

    /// Vulnerability the threat exploits.
    #[arg(long)]
    pub vuln: String,

    /// Impact severity: low, medium, or high.
    #[arg(long)]
    pub impact: Severity,

    /// Likelihood severity: low, medium, or high.
    #[arg(long)]
    pub likelihood: Severity,
}

pub fn run_add(
    args: &AddArgs,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let session = Session::open(project_root)?;
    let draft = RiskDraft::new(
        args.asset.clone(),
        args.threat.clone(),
        args.vuln.clone(),
        args.impact,
        args.likelihood,
    );

    // add() commits the record and re-runs the fetch once, so the cache is
    // settled on the grown snapshot by the time we return.
    let created = session.runtime().block_on(session.query().add(draft))?;
    render_item(&created, output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_args_parse_severities_case_insensitively() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AddArgs,
        }
        let w = Wrapper::parse_from([
            "test",
            "--asset",
            "New Web Server",
            "--threat",
            "SQL Injection",
            "--vuln",
            "Input validation missing",
            "--impact",
            "HIGH",
            "--likelihood",
            "high",
        ]);
        assert_eq!(w.args.impact, Severity::High);
        assert_eq!(w.args.likelihood, Severity::High);
    }

    #[test]
    fn add_args_reject_unknown_severity() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AddArgs,
        }
        let parsed = Wrapper::try_parse_from([
            "test",
            "--asset",
            "X",
            "--threat",
            "Y",
            "--vuln",
            "Z",
            "--impact",
            "critical",
            "--likelihood",
            "low",
        ]);
        assert!(parsed.is_err());
    }
}
