//! Parser for the `key:value` text printed by `synctex edit` / `synctex view`.
//!
//! The format is unversioned, so parsing is lenient: banner and warning lines
//! are skipped, a record starts at each `Output:` line (or when a key repeats),
//! and a record missing any required key is simply not a match.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::mapper::DocumentPoint;

/// Marker synctex prints before its result records.
pub const RESULT_BEGIN: &str = "SyncTeX result begin";

/// A source position reported by `synctex edit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub input: PathBuf,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// Box around a hit, in the same native units as the hit point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitBox {
    pub h: f64,
    pub v: f64,
    pub width: f64,
    pub height: f64,
}

/// A document position reported by `synctex view`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocumentHit {
    pub point: DocumentPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<HitBox>,
}

type Record = HashMap<String, String>;

/// Split raw output into records of `key -> value`.
pub(crate) fn parse_records(output: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut current = Record::new();

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            continue;
        }

        if !current.is_empty() && (key == "Output" || current.contains_key(key)) {
            records.push(std::mem::take(&mut current));
        }
        current.insert(key.to_string(), value.trim().to_string());
    }

    if !current.is_empty() {
        records.push(current);
    }
    records
}

fn get_f64(record: &Record, key: &str) -> Option<f64> {
    record
        .get(key)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// First record carrying a usable `Input` and `Line`.
#[must_use]
pub fn parse_edit(output: &str) -> Option<SourceLocation> {
    parse_records(output).iter().find_map(|record| {
        let input = record.get("Input").filter(|s| !s.is_empty())?;
        let line: i64 = record.get("Line")?.parse().ok()?;
        let line = u32::try_from(line).ok().filter(|l| *l > 0)?;
        let column = record
            .get("Column")
            .and_then(|c| c.parse::<i64>().ok())
            .and_then(|c| u32::try_from(c).ok());

        Some(SourceLocation {
            input: PathBuf::from(input),
            line,
            column,
        })
    })
}

/// Every record carrying a usable `Page`, `x` and `y`, in output order.
#[must_use]
pub fn parse_view(output: &str) -> Vec<DocumentHit> {
    parse_records(output)
        .iter()
        .filter_map(|record| {
            let page: u32 = record.get("Page")?.parse().ok().filter(|p| *p > 0)?;
            let x = get_f64(record, "x")?;
            let y = get_f64(record, "y")?;

            let bbox = match (
                get_f64(record, "h"),
                get_f64(record, "v"),
                get_f64(record, "W"),
                get_f64(record, "H"),
            ) {
                (Some(h), Some(v), Some(width), Some(height)) => Some(HitBox {
                    h,
                    v,
                    width,
                    height,
                }),
                _ => None,
            };

            Some(DocumentHit {
                point: DocumentPoint::new(page, x, y),
                bbox,
            })
        })
        .collect()
}
