use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, Table};

use crate::risk::RiskLevel;
use crate::types::{ClassifiedEntry, Report};

pub fn report_terminal(report: &Report, top: usize) {
    eprintln!();
    println!(
        "{} — {} vs complexity ({} files matched, {} complexity files, {} churn records)",
        "📈 ccv".red().bold(),
        report.meta.plot_mode.to_string().bright_black(),
        report.entries.len().to_string().bright_black(),
        report.meta.file_count.to_string().bright_black(),
        report.meta.churn_count.to_string().bright_black(),
    );
    println!();

    if report.entries.is_empty() {
        println!("{}", "  No files present in both the churn and complexity data.".yellow());
        println!();
        return;
    }

    println!("{}", build_table(&report.entries, top));

    // ── Band summary ───────────────────────────────────────────────────────
    println!();
    for series in &report.chart.series {
        let count = series.file_count();
        if count == 0 { continue; }
        println!(
            "    {} {} {}",
            "•".white(),
            series.name,
            format!("{count} file{}", if count != 1 { "s" } else { "" }).bright_black(),
        );
    }
    println!();
}

fn build_table(entries: &[ClassifiedEntry], top: usize) -> Table {
    let mut ranked: Vec<&ClassifiedEntry> = entries.iter().collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["RANK", "FILE", "COMPLEXITY", "CHURN", "SCORE", "RISK"]);

    for (i, e) in ranked.iter().take(top).enumerate() {
        table.add_row(vec![
            Cell::new(format!("{:3}", i + 1)),
            Cell::new(truncate_path(&e.entry.file, 48)),
            Cell::new(format!("{:.1}", e.entry.complexity)),
            Cell::new(e.entry.churn.to_string()),
            Cell::new(format!("{:.1}", e.score)).add_attribute(Attribute::Bold),
            level_cell(e.level),
        ]);
    }
    table
}

// ─── Cell builders ────────────────────────────────────────────────────────────

/// Plain label text + color, no embedded ANSI, so comfy-table measures widths correctly.
fn level_cell(level: RiskLevel) -> Cell {
    let label = level.name().to_uppercase();
    match level {
        RiskLevel::Critical => Cell::new(format!("🔴 {label}")).fg(Color::DarkRed).add_attribute(Attribute::Bold),
        RiskLevel::VeryHigh => Cell::new(format!("🔴 {label}")).fg(Color::Red),
        RiskLevel::High     => Cell::new(format!("🟠 {label}")).fg(Color::Yellow),
        RiskLevel::Medium   => Cell::new(format!("🟡 {label}")),
        RiskLevel::Low      => Cell::new(format!("🟢 {label}")).fg(Color::Green),
        RiskLevel::VeryLow  => Cell::new(format!("🟢 {label}")).fg(Color::DarkGreen),
    }
}

fn truncate_path(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max { return s.to_string(); }
    let tail: String = s.chars().skip(count - (max - 1)).collect();
    format!("…{tail}")
}
