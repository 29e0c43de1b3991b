use comfy_table::Cell;

use crate::download::DownloadReport;
use crate::jenkins::LogTarget;

use super::styling::{bright, bright_green, bright_red, bright_yellow, dim};
use super::tables::{create_table, header_cells, icon_color_cell};

/// Prints the resolved log targets as a table to stdout.
///
/// One row per log-bearing step, in pipeline execution order.
pub fn print_targets(targets: &[LogTarget]) {
    if targets.is_empty() {
        println!("{}", dim("No matching pipeline steps."));
        return;
    }

    let mut table = create_table();
    table.set_header(header_cells(&["Node", "Branch", "Step", "Status", "File"]));
    for target in targets {
        table.add_row(vec![
            Cell::new(&target.node_id),
            Cell::new(&target.branch),
            Cell::new(&target.display_name),
            icon_color_cell(&target.icon_color),
            Cell::new(format!("{}.log", target.filename)),
        ]);
    }

    println!("{table}");
    println!("{}", dim(format!("{} step logs", targets.len())));
}

/// Prints the download outcome, with failures listed individually.
pub fn print_download_summary(report: &DownloadReport) {
    println!();
    println!(
        "{} {}",
        bright_green("✓"),
        bright(format!("{} logs written", report.written))
    );
    if report.skipped > 0 {
        println!(
            "{}",
            dim(format!(
                "{} steps had no console output",
                report.skipped
            ))
        );
    }
    if !report.failed.is_empty() {
        println!(
            "{} {}",
            bright_red("✗"),
            bright_yellow(format!("{} downloads failed:", report.failed.len()))
        );
        for failure in &report.failed {
            println!("  {}", bright_red(failure));
        }
    }
}
