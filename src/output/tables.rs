use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cells(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Maps a Jenkins icon color onto a terminal color.
///
/// Running builds report animated variants (`blue_anime` etc.); they
/// color the same as their settled counterpart.
pub fn icon_color_cell(color: &str) -> Cell {
    let base = color.strip_suffix("_anime").unwrap_or(color);
    let cell = Cell::new(color);
    match base {
        "blue" => cell.fg(TableColor::Green),
        "red" => cell.fg(TableColor::Red),
        "yellow" => cell.fg(TableColor::Yellow),
        "aborted" | "notbuilt" | "disabled" | "grey" => cell.fg(TableColor::DarkGrey),
        _ => cell,
    }
}
