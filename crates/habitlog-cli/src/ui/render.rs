//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, NOTHING, UTF8_FULL};
use comfy_table::{Attribute, Cell, ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "habitlog · command (context)"
/// Plain mode: "habitlog command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("habitlog", styles::bold(), ctx.color);
            match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            }
        }
        OutputMode::Plain => format!("habitlog {}", command),
        OutputMode::Json => String::new(),
    }
}

/// Render a section title inside a report.
pub fn section(ctx: &UiContext, title: &str) -> String {
    if ctx.mode.is_pretty() {
        styled(title, styles::bold(), ctx.color)
    } else {
        format!("[{}]", title.to_lowercase().replace(' ', "_"))
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

/// Render a hint line.
pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a receipt (summary block after an action).
///
/// Pretty mode: badge + indented key-value pairs
/// Plain mode: status=ok + key=value lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }

    lines.join("\n")
}

/// Column definition for table rendering.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self { header }
    }
}

/// Render a bordered table in pretty mode, space-separated rows otherwise.
pub fn table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }

    let mut table = ComfyTable::new();
    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(u16::try_from(ctx.width).unwrap_or(u16::MAX));
    table.set_header(columns.iter().map(|c| c.header));
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Render a borderless table (for entry lists).
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }

    let mut table = ComfyTable::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|c| {
            let cell = Cell::new(c.header);
            if ctx.color {
                cell.add_attribute(Attribute::Dim)
            } else {
                cell
            }
        })
        .collect();
    table.set_header(header_cells);

    for i in 0..columns.len() {
        if let Some(column) = table.column_mut(i) {
            column.set_padding((0, 2));
        }
    }
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

fn plain_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a message unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

/// Print an empty line (only in pretty mode).
pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// Format an error message with optional hint.
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(hint(ctx, h));
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h));
        }
    }

    lines.join("\n")
}

/// Print an error message to stderr with optional hint.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_ctx() -> UiContext {
        UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    fn pretty_ctx() -> UiContext {
        UiContext {
            is_tty: true,
            color: false,
            unicode: true,
            width: 80,
            mode: OutputMode::Pretty,
        }
    }

    #[test]
    fn test_header() {
        assert_eq!(header(&plain_ctx(), "stats", None), "habitlog stats");
        let pretty = header(&pretty_ctx(), "stats", Some("2024-03"));
        assert!(pretty.contains("habitlog"));
        assert!(pretty.contains("(2024-03)"));
    }

    #[test]
    fn test_kv_modes() {
        assert_eq!(kv(&plain_ctx(), "Habit days", "3"), "habit_days=3");
        assert!(kv(&pretty_ctx(), "Habit days", "3").contains("Habit days:"));
    }

    #[test]
    fn test_section_plain() {
        assert_eq!(section(&plain_ctx(), "This week"), "[this_week]");
    }

    #[test]
    fn test_receipt_plain() {
        let r = receipt(&plain_ctx(), "Recorded", &[("Date", "2024-03-04")]);
        assert_eq!(r, "status=ok\ndate=2024-03-04");
    }

    #[test]
    fn test_receipt_pretty() {
        let r = receipt(&pretty_ctx(), "Recorded", &[("Date", "2024-03-04")]);
        assert!(r.contains("[\u{2713}] Recorded"));
        assert!(r.contains("  Date: 2024-03-04"));
    }

    #[test]
    fn test_table_plain_has_no_header() {
        let columns = [Column::new("DATE"), Column::new("HABITS")];
        let rows = vec![vec!["2024-03-04".to_string(), "Run".to_string()]];
        assert_eq!(table(&plain_ctx(), &columns, &rows), "2024-03-04 Run");
    }

    #[test]
    fn test_tables_pretty_include_headers() {
        let columns = [Column::new("DATE"), Column::new("HABITS")];
        let rows = vec![vec!["2024-03-04".to_string(), "Run".to_string()]];
        for rendered in [
            table(&pretty_ctx(), &columns, &rows),
            simple_table(&pretty_ctx(), &columns, &rows),
        ] {
            assert!(rendered.contains("DATE"));
            assert!(rendered.contains("Run"));
        }
    }

    #[test]
    fn test_error_message() {
        let e = error_message(&plain_ctx(), "No store", Some("habitlog init"));
        assert_eq!(e, "error=No store\nhint=habitlog init");
        let e = error_message(&pretty_ctx(), "No store", None);
        assert!(e.contains("[\u{2717}]"));
    }
}
