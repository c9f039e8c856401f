//! Plain text output for the terminal

use super::{Card, Detail, DisplayNode, Table, TimelineEntry};
use crate::utils::text::width;
use std::fmt::Write;

/// Render a display tree as plain text
pub fn render_text(node: &DisplayNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &DisplayNode) {
    match node {
        DisplayNode::Loading { label } => {
            let _ = writeln!(out, "  {}", label);
        }
        DisplayNode::ErrorPanel {
            message, retry_label, ..
        } => {
            let _ = writeln!(out, "  ! {}", message);
            let _ = writeln!(out, "  [{}]", retry_label);
        }
        DisplayNode::NoContent { label } => {
            let _ = writeln!(out, "  ({})", label);
        }
        DisplayNode::Section { title, body } => {
            let _ = writeln!(out, "{}", title);
            let _ = writeln!(out, "{}", "=".repeat(width(title)));
            write_node(out, body);
        }
        DisplayNode::Timeline(entries) => write_timeline(out, entries),
        DisplayNode::Cards(cards) => write_cards(out, cards),
        DisplayNode::Detail(detail) => write_detail(out, detail),
        DisplayNode::Table(table) => write_table(out, table),
    }
}

fn write_timeline(out: &mut String, entries: &[TimelineEntry]) {
    let year_width = entries.iter().map(|e| width(&e.year)).max().unwrap_or(0);
    for entry in entries {
        let pad = year_width - width(&entry.year);
        let _ = writeln!(out, "  {}{}  {}", entry.year, " ".repeat(pad), entry.title);
        if let Some(description) = &entry.description {
            let _ = writeln!(out, "  {}  {}", " ".repeat(year_width), description);
        }
    }
}

fn write_cards(out: &mut String, cards: &[Card]) {
    for card in cards {
        match &card.date {
            Some(date) => {
                let _ = writeln!(out, "  * {} ({})", card.title, date);
            }
            None => {
                let _ = writeln!(out, "  * {}", card.title);
            }
        }
        if let Some(summary) = &card.summary {
            let _ = writeln!(out, "    {}", summary);
        }
    }
}

fn write_detail(out: &mut String, detail: &Detail) {
    if let Some(title) = &detail.title {
        let _ = writeln!(out, "  {}", title);
    }
    if let Some(date) = &detail.date {
        let _ = writeln!(out, "  {}", date);
    }
    if let Some(body) = &detail.body {
        let _ = writeln!(out, "\n  {}", body);
    }
    if !detail.fields.is_empty() {
        out.push('\n');
        for (key, value) in &detail.fields {
            let _ = writeln!(out, "  {}: {}", key, value);
        }
    }
}

fn write_table(out: &mut String, table: &Table) {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| width(c)).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(width(cell));
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{}{}", cell, " ".repeat(w - width(cell))))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let _ = writeln!(out, "  {}", line(&table.columns).trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "  {}", rule.join("-+-"));
    for row in &table.rows {
        let _ = writeln!(out, "  {}", line(row).trim_end());
    }
}
