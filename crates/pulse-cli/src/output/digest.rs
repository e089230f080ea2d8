// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::DigestResult;

use super::Renderable;

/// Writes chunks separated by a dim marker when there is more than one.
pub(super) fn write_chunks(
    w: &mut dyn Write,
    chunks: &[String],
    ctx: &OutputContext,
) -> io::Result<()> {
    let total = chunks.len();
    for (index, chunk) in chunks.iter().enumerate() {
        if total > 1 && !ctx.quiet {
            writeln!(
                w,
                "{}",
                style(format!("--- message {}/{total} ---", index + 1)).dim()
            )?;
        }
        writeln!(w, "{chunk}")?;
    }
    Ok(())
}

impl Renderable for DigestResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        write_chunks(w, &self.chunks, ctx)?;

        if ctx.verbose {
            writeln!(
                w,
                "{}",
                style(format!(
                    "run {} | {} requests, {} failed",
                    self.run_id, self.stats.attempted, self.stats.failed
                ))
                .dim()
            )?;
        }
        Ok(())
    }
}
