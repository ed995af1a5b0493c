//! Command body and report output.

use std::io::{self, Write};

use anyhow::Context;

use importers::{Analysis, GoResolver, GoToolchain, Query};

/// Run a query against the Go toolchain and print the report to stdout.
pub fn run(toolchain: GoToolchain, query: &Query, why: bool) -> anyhow::Result<()> {
    let resolver = GoResolver::new(toolchain);
    let analysis = query.run(&resolver)?;

    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, &analysis, why).context("failed to write results")
}

/// Write one line per importer, in sorted order.
///
/// With `why`, each line is `package: chain`, the chain being the shortest
/// sequence of imports from the package to a target.
fn write_report<W: Write>(out: &mut W, analysis: &Analysis, why: bool) -> io::Result<()> {
    if why {
        for chain in analysis.explain() {
            if let Some(importer) = chain.packages().first() {
                writeln!(out, "{importer}: {chain}")?;
            }
        }
    } else {
        for id in analysis.importers() {
            writeln!(out, "{id}")?;
        }
    }
    out.flush()
}
