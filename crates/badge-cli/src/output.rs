use badge_core::readme::PatchOutcome;
use badge_core::store::SyncReport;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Left-aligned columns, two spaces apart, with a dashed rule under the header.
/// Widths count chars so display strings with non-ASCII text line up.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = pad_line(headers.iter().copied(), &widths);
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// One-line summary of a patch or sync pass against `target`.
pub fn report_line(target: &str, report: &SyncReport, dry_run: bool) -> String {
    if !report.changed {
        return format!("{target}: badge already up to date");
    }
    let action = match report.outcome {
        PatchOutcome::Replaced => "replaced badge",
        PatchOutcome::Prepended => "added badge",
    };
    if dry_run {
        format!("{target}: would have {action} (dry run)")
    } else {
        format!("{target}: {action}")
    }
}
