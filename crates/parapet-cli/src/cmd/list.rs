//! `par list`: fetch the register and print it, optionally filtered.

use clap::Args;

use parapet_core::filter;

use crate::cmd::Session;
use crate::output::{OutputMode, render_list};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive substring filter across all record fields.
    #[arg(short, long)]
    pub filter: Option<String>,
}

pub fn run_list(
    args: &ListArgs,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let session = Session::open(project_root)?;
    let snapshot = session.fetch_snapshot()?;
    let rows = filter::apply(&snapshot, args.filter.as_deref().unwrap_or(""));
    render_list(&rows, output)?;
    Ok(())
}
