//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "Cashflow · command (context)" with optional path
/// Plain mode: "cashflow command"
///
/// # Arguments
/// - `command`: The command name (e.g., "summary", "history")
/// - `context`: Optional context shown in parentheses (e.g., a period name)
/// - `path`: Optional budget path to display on second line
pub fn header_with_context(
    ctx: &UiContext,
    command: &str,
    context: Option<&str>,
    path: Option<&str>,
) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Cashflow", styles::bold(), ctx.color);
            let mut out = match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            };
            if let Some(p) = path {
                let display_path = if p.chars().count() > 50 {
                    let tail: String = p.chars().skip(p.chars().count() - 47).collect();
                    format!("...{}", tail)
                } else {
                    p.to_string()
                };
                out.push_str(&format!("\n{}", kv(ctx, "File", &display_path)));
            }
            out
        }
        OutputMode::Plain => format!("cashflow {}", command),
        OutputMode::Json => String::new(),
    }
}

pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    header_with_context(ctx, command, context, None)
}

/// Render a divider line.
pub fn divider(ctx: &UiContext) -> String {
    if ctx.mode.is_pretty() {
        let glyph = if ctx.unicode { "\u{2500}" } else { "-" };
        glyph.repeat(ctx.width.min(60))
    } else {
        "---".to_string()
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
/// Pretty mode: Badge + indented key-value pairs
/// Plain mode: status=ok + key=value lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, String)]) -> String {
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
    pub numeric: bool,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self {
            header,
            numeric: false,
        }
    }

    /// A right-aligned amount column.
    pub const fn amount(header: &'static str) -> Self {
        Self {
            header,
            numeric: true,
        }
    }
}

/// Plain mode: tab-separated values, no header.
fn plain_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn align_numeric(table: &mut ComfyTable, columns: &[Column]) {
    for (i, col) in columns.iter().enumerate() {
        if col.numeric {
            if let Some(column) = table.column_mut(i) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
    }
}

/// Render a bordered table in pretty mode.
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
        table.load_preset(comfy_table::presets::ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(ctx.width as u16);

    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    table.set_header(headers);
    for row in rows {
        table.add_row(row);
    }
    align_numeric(&mut table, columns);

    table.to_string()
}

/// Render a table without borders (for lists).
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }

    let mut table = ComfyTable::new();
    table.load_preset(comfy_table::presets::NOTHING);
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
    align_numeric(&mut table, columns);

    table.to_string()
}

/// Print a message to stdout unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() && !message.is_empty() {
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
///
/// Pretty mode: "[ERR] message" with optional "Hint: ..." on next line
/// Plain mode: "error=message" with optional "hint=suggestion"
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
            stdin_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    fn pretty_ctx() -> UiContext {
        UiContext {
            is_tty: true,
            stdin_tty: true,
            color: false,
            unicode: true,
            width: 80,
            mode: OutputMode::Pretty,
        }
    }

    #[test]
    fn test_header_pretty() {
        let h = header(&pretty_ctx(), "summary", Some("Jan"));
        assert!(h.contains("Cashflow"));
        assert!(h.contains("summary (Jan)"));
    }

    #[test]
    fn test_header_plain() {
        assert_eq!(header(&plain_ctx(), "history", None), "cashflow history");
    }

    #[test]
    fn test_header_truncates_long_path() {
        let long_path = "/a/very/long/path/that/exceeds/fifty/characters/of/budget/home.cashflow";
        let h = header_with_context(&pretty_ctx(), "status", None, Some(long_path));
        assert!(h.contains("File:"));
        assert!(h.contains("..."));
        assert!(h.contains("home.cashflow"));
    }

    #[test]
    fn test_kv_modes() {
        assert_eq!(kv(&plain_ctx(), "Log Index", "3"), "log_index=3");
        let line = kv(&pretty_ctx(), "Log Index", "3");
        assert!(line.contains("Log Index:"));
    }

    #[test]
    fn test_hint_plain() {
        assert_eq!(hint(&plain_ctx(), "cashflow undo"), "hint=cashflow undo");
    }

    #[test]
    fn test_receipt_plain() {
        let items = [("Period", "Jan".to_string()), ("Log Index", "1".to_string())];
        let r = receipt(&plain_ctx(), "Added period", &items);
        assert_eq!(r, "status=ok\nperiod=Jan\nlog_index=1");
    }

    #[test]
    fn test_receipt_pretty() {
        let items = [("Period", "Jan".to_string())];
        let r = receipt(&pretty_ctx(), "Added period", &items);
        assert!(r.contains("[\u{2713}]"));
        assert!(r.contains("Added period"));
        assert!(r.contains("  Period: Jan"));
    }

    #[test]
    fn test_table_plain_is_tab_separated() {
        let columns = [Column::new("Item"), Column::amount("Budget")];
        let rows = vec![
            vec!["Rent".to_string(), "1,200.00".to_string()],
            vec!["Water".to_string(), "40.00".to_string()],
        ];
        assert_eq!(
            table(&plain_ctx(), &columns, &rows),
            "Rent\t1,200.00\nWater\t40.00"
        );
    }

    #[test]
    fn test_table_pretty_has_headers() {
        let columns = [Column::new("Item"), Column::amount("Budget")];
        let rows = vec![vec!["Rent".to_string(), "1,200.00".to_string()]];
        let t = table(&pretty_ctx(), &columns, &rows);
        assert!(t.contains("Item"));
        assert!(t.contains("Budget"));
        assert!(t.contains("1,200.00"));
    }

    #[test]
    fn test_table_empty_rows_keeps_headers() {
        let columns = [Column::new("Period")];
        let t = table(&pretty_ctx(), &columns, &[]);
        assert!(t.contains("Period"));
    }

    #[test]
    fn test_simple_table_pretty() {
        let columns = [Column::new("Id"), Column::new("Name")];
        let rows = vec![vec!["7a2e3c0b".to_string(), "Jan".to_string()]];
        let t = simple_table(&pretty_ctx(), &columns, &rows);
        assert!(t.contains("Id"));
        assert!(t.contains("Jan"));
    }

    #[test]
    fn test_divider() {
        assert!(divider(&pretty_ctx()).contains("\u{2500}"));
        assert_eq!(divider(&plain_ctx()), "---");
    }

    #[test]
    fn test_error_message() {
        let e = error_message(&pretty_ctx(), "Nothing to undo", Some("cashflow history"));
        assert!(e.contains("[\u{2717}]"));
        assert!(e.contains("Hint: cashflow history"));

        let e = error_message(&plain_ctx(), "Nothing to undo", None);
        assert_eq!(e, "error=Nothing to undo");
    }
}
