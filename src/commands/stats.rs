use clap::Args;
use unicode_width::UnicodeWidthStr;

use qtians_core::{normalize_date, StatsTable};

use super::{open_workflow, today, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct StatsCommand {
    /// Date to count (defaults to today)
    #[arg(long, short)]
    pub date: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Use the local cache without contacting the spreadsheet
    #[arg(long)]
    pub offline: bool,
}

impl StatsCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut workflow = open_workflow(config)?;
        if !self.offline {
            workflow.refresh().await;
        }

        let date = normalize_date(&self.date.clone().unwrap_or_else(today));
        let table = workflow.stats(&date, &config.groups);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
            OutputFormat::Text => print!("{}", render_table(&table)),
        }

        Ok(())
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(fill))
}

fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", " ".repeat(fill), text)
}

/// Renders the table with a totals row and column, widths measured in
/// terminal cells.
fn render_table(table: &StatsTable) -> String {
    const TOTAL: &str = "합계";

    let label_width = table
        .rows
        .iter()
        .map(|r| UnicodeWidthStr::width(r.chapel.as_str()))
        .chain([UnicodeWidthStr::width(TOTAL)])
        .max()
        .unwrap_or(0);
    let col_widths: Vec<usize> = table
        .villages
        .iter()
        .map(|v| UnicodeWidthStr::width(v.as_str()).max(3))
        .collect();
    let total_width = UnicodeWidthStr::width(TOTAL).max(3);

    let mut out = format!("{} 묵상 현황\n\n", table.date);

    out.push_str(&pad("", label_width));
    for (village, width) in table.villages.iter().zip(&col_widths) {
        out.push_str("  ");
        out.push_str(&pad_left(village, *width));
    }
    out.push_str("  ");
    out.push_str(&pad_left(TOTAL, total_width));
    out.push('\n');

    for row in &table.rows {
        out.push_str(&pad(&row.chapel, label_width));
        for (count, width) in row.counts.iter().zip(&col_widths) {
            out.push_str("  ");
            out.push_str(&pad_left(&count.to_string(), *width));
        }
        out.push_str("  ");
        out.push_str(&pad_left(&row.total.to_string(), total_width));
        out.push('\n');
    }

    out.push_str(&pad(TOTAL, label_width));
    for (village, width) in table.villages.iter().zip(&col_widths) {
        let sum = table.village_total(village).unwrap_or(0);
        out.push_str("  ");
        out.push_str(&pad_left(&sum.to_string(), *width));
    }
    out.push_str("  ");
    out.push_str(&pad_left(&table.cell_sum().to_string(), total_width));
    out.push('\n');

    out.push_str(&format!("\nTotal submissions: {}\n", table.total));
    if table.unrecognized() > 0 {
        out.push_str(&format!(
            "({} outside the listed chapels and villages)\n",
            table.unrecognized()
        ));
    }
    out
}
