//! Content layouts built from loaded payloads

use super::DisplayNode;
use crate::catalog::Layout;
use crate::i18n::{self, Locale, UiText};
use crate::resource::Payload;
use crate::utils::json::{field_i64, field_text, scalar_text};
use crate::utils::text;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Longest card summary, in characters
const SUMMARY_MAX_CHARS: usize = 200;

/// Fields shown elsewhere in a detail view, or not meant for display
const DETAIL_HIDDEN_FIELDS: &[&str] = &[
    "id",
    "title",
    "name",
    "description",
    "content",
    "text",
    "summary",
    "short_description",
    "published_at",
    "date",
    "created_at",
    "updated_at",
    "slug",
    "image",
    "photo",
    "info",
];

/// One step of a history timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub year: String,
    pub title: String,
    pub description: Option<String>,
}

/// A title + summary card
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub date: Option<String>,
    pub summary: Option<String>,
}

/// A single record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Detail {
    pub title: Option<String>,
    pub date: Option<String>,
    pub body: Option<String>,
    pub fields: Vec<(String, String)>,
}

/// Rows with a label column followed by numeric columns
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Lay out a non-empty payload; `None` when nothing displayable remains
pub(super) fn build(payload: &Payload, layout: Layout, locale: Locale) -> Option<DisplayNode> {
    if !payload.is_array() && !payload.is_object() {
        let body = scalar_text(payload)?;
        return Some(DisplayNode::Detail(Detail {
            body: Some(body),
            ..Detail::default()
        }));
    }

    match layout {
        Layout::Timeline => timeline(payload).or_else(|| cards(payload)),
        Layout::Cards => cards(payload),
        Layout::Detail => detail(payload).or_else(|| cards(payload)),
        Layout::Table => table(payload, locale).or_else(|| cards(payload)),
    }
}

/// Array items, or the payload itself as a single record
fn records(payload: &Payload) -> Vec<&Value> {
    match payload {
        Value::Array(items) => items.iter().filter(|v| !v.is_null()).collect(),
        other => vec![other],
    }
}

fn timeline(payload: &Payload) -> Option<DisplayNode> {
    let mut entries: Vec<(Option<i64>, TimelineEntry)> = records(payload)
        .into_iter()
        .filter(|r| r.is_object())
        .filter_map(|record| {
            let year_num = field_i64(record, "year");
            let year = year_num
                .map(|y| y.to_string())
                .or_else(|| field_text(record, "year"))
                .or_else(|| field_text(record, "date"))
                .unwrap_or_default();
            let title = field_text(record, "title").unwrap_or_default();
            if year.is_empty() && title.is_empty() {
                return None;
            }
            let entry = TimelineEntry {
                year,
                title,
                description: field_text(record, "description"),
            };
            Some((year_num, entry))
        })
        .collect();

    if entries.is_empty() {
        return None;
    }

    // Numbered years ascending, undated steps keep their order at the end
    entries.sort_by_key(|(year, _)| (year.is_none(), *year));
    Some(DisplayNode::Timeline(entries.into_iter().map(|(_, e)| e).collect()))
}

fn cards(payload: &Payload) -> Option<DisplayNode> {
    let mut cards: Vec<(Option<NaiveDate>, Card)> = records(payload)
        .into_iter()
        .filter_map(|record| {
            if !record.is_object() {
                let title = scalar_text(record)?;
                return Some((None, Card { title, date: None, summary: None }));
            }

            let date = field_text(record, "published_at").and_then(|s| parse_date(&s));
            let title = field_text(record, "title").or_else(|| fallback_title(record))?;
            let summary = field_text(record, "summary")
                .or_else(|| field_text(record, "description"))
                .map(|s| text::truncate(&s, SUMMARY_MAX_CHARS));
            let card = Card {
                title,
                date: date.map(format_date),
                summary,
            };
            Some((date, card))
        })
        .collect();

    if cards.is_empty() {
        return None;
    }

    // Dated cards newest first; undated ones keep backend order after them
    if cards.iter().any(|(date, _)| date.is_some()) {
        cards.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    Some(DisplayNode::Cards(cards.into_iter().map(|(_, c)| c).collect()))
}

/// First scalar field of a record, for records without a title
fn fallback_title(record: &Value) -> Option<String> {
    record
        .as_object()?
        .iter()
        .filter(|(key, _)| key.as_str() != "id")
        .find_map(|(key, value)| scalar_text(value).map(|v| format!("{}: {}", key, v)))
}

fn detail(payload: &Payload) -> Option<DisplayNode> {
    let record = records(payload).into_iter().find(|r| r.is_object())?;
    let map = record.as_object()?;

    let fields: Vec<(String, String)> = map
        .iter()
        .filter(|(key, _)| !DETAIL_HIDDEN_FIELDS.contains(&key.as_str()))
        .filter_map(|(key, value)| scalar_text(value).map(|v| (key.replace('_', " "), v)))
        .collect();

    let detail = Detail {
        title: field_text(record, "title"),
        date: field_text(record, "published_at")
            .and_then(|s| parse_date(&s))
            .map(format_date),
        body: field_text(record, "description"),
        fields,
    };

    if detail == Detail::default() {
        return None;
    }
    Some(DisplayNode::Detail(detail))
}

fn table(payload: &Payload, locale: Locale) -> Option<DisplayNode> {
    let rows: Vec<&Value> = records(payload).into_iter().filter(|r| r.is_object()).collect();

    let mut numeric: Vec<String> = Vec::new();
    for record in &rows {
        if let Some(map) = record.as_object() {
            for (key, value) in map {
                if key != "id" && value.is_number() && !numeric.contains(key) {
                    numeric.push(key.clone());
                }
            }
        }
    }

    if numeric.is_empty() {
        return None;
    }

    let mut columns = vec![i18n::text(locale, UiText::Program).to_string()];
    columns.extend(numeric.iter().map(|k| k.replace('_', " ")));

    let rows = rows
        .iter()
        .map(|record| {
            let mut row = vec![field_text(record, "title").unwrap_or_default()];
            row.extend(numeric.iter().map(|key| field_text(record, key).unwrap_or_default()));
            row
        })
        .collect();

    Some(DisplayNode::Table(Table { columns, rows }))
}

/// Dates arrive as RFC 3339, naive timestamps or plain dates
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
