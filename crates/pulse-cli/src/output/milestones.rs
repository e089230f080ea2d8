// SPDX-License-Identifier: Apache-2.0

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::MilestonesResult;

use super::Renderable;

impl MilestonesResult {
    /// Builds the milestone table.
    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Section", "Milestone", "Open", "Closed", "Complete"]);

        for row in &self.milestones {
            table.add_row(vec![
                row.heading.clone(),
                row.title.clone(),
                row.open_issues.to_string(),
                row.closed_issues.to_string(),
                format!("{}%", row.completion_percent),
            ]);
        }
        table
    }
}

impl Renderable for MilestonesResult {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        if self.milestones.is_empty() {
            writeln!(
                w,
                "{}",
                style("No milestones were updated in the look-back window.").dim()
            )?;
            return Ok(());
        }
        writeln!(w, "{}", self.table())
    }
}
