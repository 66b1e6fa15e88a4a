//! Plain-text and markdown rendering of lineage results

use colored::Colorize;
use viewlineage_core::{Diagnostic, LineageReport, ReportRow, Severity};
use viewlineage_xml::DomNode;

const ROW_HEADERS: [&str; 4] = ["SCHEMA_NAME", "TABLE_NAME", "COLUMN_NAME", "VIEWS"];

/// Render cells as left-aligned columns separated by two spaces
fn align(headers: &[&str], cells: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |values: Vec<&str>| -> String {
        let last = values.len().saturating_sub(1);
        let mut out = String::new();
        for (i, (value, width)) in values.iter().zip(&widths).enumerate() {
            if i == last {
                out.push_str(value);
            } else {
                out.push_str(&format!("{:<width$}  ", value, width = width));
            }
        }
        out.trim_end().to_string()
    };

    let mut out = line(headers.to_vec());
    out.push('\n');
    for row in cells {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Lineage rows as an aligned table
pub fn render_table(rows: &[ReportRow]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.schema_name.clone(),
                r.table_name.clone(),
                r.column_name.clone(),
                r.views.clone(),
            ]
        })
        .collect();
    align(&ROW_HEADERS, &cells)
}

/// Escape a value for a markdown table cell
fn md_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Generate markdown report
pub fn render_markdown(report: &LineageReport) -> String {
    let mut md = String::new();

    md.push_str("# View Lineage Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Views analyzed: {}\n", report.summary.views_analyzed));
    md.push_str(&format!("- Views failed: {}\n", report.summary.views_failed));
    md.push_str(&format!("- Base columns: {}\n", report.summary.columns));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Info: {}\n", report.summary.info));
    md.push('\n');

    md.push_str("## Lineage\n\n");
    if report.rows.is_empty() {
        md.push_str("_No base columns found._\n\n");
    } else {
        md.push_str("| Schema | Table | Column | Views |\n");
        md.push_str("|---|---|---|---|\n");
        for row in &report.rows {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                md_cell(&row.schema_name),
                md_cell(&row.table_name),
                md_cell(&row.column_name),
                md_cell(&row.views)
            ));
        }
        md.push('\n');
    }

    if !report.diagnostics.is_empty() {
        md.push_str("## Diagnostics\n\n");

        for diag in &report.diagnostics {
            let severity_emoji = match diag.severity {
                Severity::Error => "❌",
                Severity::Warn => "⚠️",
                Severity::Info => "ℹ️",
            };

            md.push_str(&format!("### {} {} - {}\n\n", severity_emoji, diag.severity, diag.code));
            md.push_str(&format!("{}\n\n", diag.message));

            if let Some(loc) = &diag.location {
                md.push_str(&format!("**Location:** {}", loc.file));
                if let (Some(line), Some(column)) = (loc.line, loc.column) {
                    md.push_str(&format!(":{}:{}", line, column));
                }
                md.push_str("\n\n");
            }
        }
    }

    md
}

/// `[SEVERITY] CODE: message` line, followed by the location when known
pub fn render_diagnostic(diag: &Diagnostic) -> String {
    let severity = match diag.severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warn => "WARN".yellow().bold(),
        Severity::Info => "INFO".cyan(),
    };

    let mut out = format!("[{}] {}: {}\n", severity, diag.code, diag.message);
    if let Some(loc) = &diag.location {
        out.push_str(&format!("    at {}", loc.file));
        if let (Some(line), Some(column)) = (loc.line, loc.column) {
            out.push_str(&format!(":{}:{}", line, column));
        }
        out.push('\n');
    }
    out
}

/// Node table dump, one node per line
pub fn render_nodes(nodes: &[DomNode]) -> String {
    let cells: Vec<Vec<String>> = nodes
        .iter()
        .map(|n| {
            vec![
                n.node_id.to_string(),
                n.parent_node_id.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
                n.node_type.to_string(),
                n.node_name.clone(),
                format!("{}+{}", n.pos, n.len),
                n.node_value
                    .as_deref()
                    .map(|v| format!("{:?}", v))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    align(&["ID", "PARENT", "TYPE", "NAME", "POS", "VALUE"], &cells)
}
