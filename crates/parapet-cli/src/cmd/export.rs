//! `par export`: write the unfiltered snapshot as CSV.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use parapet_core::export::render_csv;

use crate::cmd::Session;
use crate::output::{OutputMode, pretty_kv, render_mode};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output CSV path (defaults to the configured export path).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    exported: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

pub fn run_export(
    args: &ExportArgs,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let session = Session::open(project_root)?;
    let snapshot = session.fetch_snapshot()?;

    // Export serializes the snapshot as fetched; any active view filter
    // never applies here.
    let report = match render_csv(&snapshot) {
        None => ExportReport {
            exported: 0,
            path: None,
        },
        Some(csv) => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| project_root.join(&session.config().export.path));
            let file = File::create(&path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut out = BufWriter::new(file);
            writeln!(out, "{csv}")?;
            ExportReport {
                exported: snapshot.len(),
                path: Some(path.display().to_string()),
            }
        }
    };

    render_mode(output, &report, render_report_text, render_report_pretty)?;
    Ok(())
}

fn render_report_text(report: &ExportReport, w: &mut dyn Write) -> io::Result<()> {
    match report.path.as_deref() {
        Some(path) => writeln!(w, "exported {} records to {path}", report.exported),
        None => writeln!(w, "no data to export"),
    }
}

fn render_report_pretty(report: &ExportReport, w: &mut dyn Write) -> io::Result<()> {
    match report.path.as_deref() {
        Some(path) => {
            pretty_kv(w, "exported", report.exported.to_string())?;
            pretty_kv(w, "path", path)
        }
        None => writeln!(w, "No data to export."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_args_default_to_configured_path() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ExportArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.output.is_none());
        let w = Wrapper::parse_from(["test", "--output", "out.csv"]);
        assert_eq!(w.args.output, Some(PathBuf::from("out.csv")));
    }
}
