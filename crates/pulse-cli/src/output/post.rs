// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::PostResult;

use super::Renderable;
use super::digest::write_chunks;

impl Renderable for PostResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        if self.dry_run {
            write_chunks(w, &self.chunks, ctx)?;
            writeln!(
                w,
                "{}",
                style(format!(
                    "Dry run - {} message(s) not posted to {}.",
                    self.chunks.len(),
                    self.channel
                ))
                .yellow()
            )?;
        } else if !ctx.quiet {
            writeln!(
                w,
                "{} Posted {} message(s) to {}",
                style("✓").green(),
                self.posted,
                style(&self.channel).cyan()
            )?;
        }
        Ok(())
    }
}
