//! Record file import/export and log inspection helpers

use super::model::{ActionRecord, ActionType};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Serialize records as indented JSON, the export file format
pub fn export_records(records: &[ActionRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// File name for an export made on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("action-records-{}.json", date.format("%Y-%m-%d"))
}

/// Write an export into `dir`, returning the created file path
pub fn write_export(dir: &Path, records: &[ActionRecord]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(Utc::now().date_naive()));
    std::fs::write(&path, export_records(records)?)?;
    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Load an exported record file
///
/// Entries that do not match the record schema are skipped with a warning;
/// an unreadable file or malformed JSON is an error.
pub fn load_records_from_file(path: &Path) -> Result<Vec<ActionRecord>> {
    log::info!("Loading records from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

/// Parse an exported record list, skipping malformed entries
pub fn parse_records(content: &str) -> Result<Vec<ActionRecord>> {
    let items: Vec<serde_json::Value> = serde_json::from_str(content)?;
    let total = items.len();

    let records: Vec<ActionRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping record {}: {}", i + 1, e);
                None
            }
        })
        .collect();

    log::info!("Loaded {}/{} records", records.len(), total);
    Ok(records)
}

/// Completeness report over a record log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub missing_urls: usize,
    pub missing_selectors: usize,
    pub missing_xpaths: usize,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.invalid_records == 0
    }
}

/// Check every record has the fields a replay needs to locate its element
pub fn validate_records(records: &[ActionRecord]) -> ValidationReport {
    let mut report = ValidationReport {
        total_records: records.len(),
        ..Default::default()
    };

    for (i, record) in records.iter().enumerate() {
        let mut valid = true;

        if record.url.trim().is_empty() {
            report.missing_urls += 1;
            report.errors.push(format!("Record {}: missing URL", i + 1));
            valid = false;
        }
        if record.element.selector.trim().is_empty() {
            report.missing_selectors += 1;
            report.errors.push(format!("Record {}: missing CSS selector", i + 1));
            valid = false;
        }
        if record.element.xpath.trim().is_empty() {
            report.missing_xpaths += 1;
            report.errors.push(format!("Record {}: missing XPath", i + 1));
            valid = false;
        }

        if valid {
            report.valid_records += 1;
        } else {
            report.invalid_records += 1;
        }
    }

    report
}

pub fn filter_by_type(records: &[ActionRecord], types: &[ActionType]) -> Vec<ActionRecord> {
    records
        .iter()
        .filter(|r| types.contains(&r.action))
        .cloned()
        .collect()
}

/// Records whose URL contains `pattern`
pub fn filter_by_url(records: &[ActionRecord], pattern: &str) -> Vec<ActionRecord> {
    records
        .iter()
        .filter(|r| r.url.contains(pattern))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsSummary {
    pub total: usize,
    pub by_type: BTreeMap<&'static str, usize>,
    pub urls: BTreeSet<String>,
    pub time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

pub fn summarize_records(records: &[ActionRecord]) -> RecordsSummary {
    let mut summary = RecordsSummary {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        *summary.by_type.entry(record.action.as_str()).or_insert(0) += 1;
        if !record.url.is_empty() {
            summary.urls.insert(record.url.clone());
        }
    }

    let start = records.iter().map(|r| r.timestamp).min();
    let end = records.iter().map(|r| r.timestamp).max();
    summary.time_range = start.zip(end);

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::model::ElementInfo;
    use chrono::TimeZone;

    fn record(action: ActionType, url: &str, second: u32) -> ActionRecord {
        ActionRecord::new(
            action,
            format!("{} at {}", action, second),
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, second).unwrap(),
            ElementInfo::new("INPUT").with_paths("//*[@id=\"q\"]", "#q"),
        )
        .with_url(url)
    }

    #[test]
    fn test_export_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record(ActionType::Click, "https://a.test/", 1),
            record(ActionType::Input, "https://a.test/", 2).with_value("hello"),
        ];

        let path = write_export(dir.path(), &records).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("action-records-"));
        assert!(name.ends_with(".json"));

        let loaded = load_records_from_file(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_export_is_indented() {
        let text = export_records(&[record(ActionType::Submit, "https://a.test/", 3)]).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"type\": \"submit\""));
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let json = r#"[
            {"type": "click", "description": "ok", "url": "u", "timestamp": "2024-05-01T09:30:00Z",
             "element": {"tagName": "A", "xpath": "/a", "selector": "a"}},
            {"type": "hover", "description": "unknown type"},
            {"description": "no type"}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "ok");

        assert!(parse_records("{not json").is_err());
    }

    #[test]
    fn test_keeps_svg_and_fractional_pointer_records() {
        let json = r#"[
            {"type": "click", "description": "icon", "url": "u", "timestamp": "2024-05-01T09:30:00Z",
             "element": {"tagName": "path", "className": {}, "xpath": "/svg/path", "selector": "path"},
             "position": {"x": 120.5, "y": 48.25}},
            {"type": "click", "description": "link", "url": "u", "timestamp": "2024-05-01T09:30:01Z",
             "element": {"tagName": "A", "className": "nav", "xpath": "/a", "selector": "a"},
             "position": {"x": 3, "y": 7}}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].element.class_name, "");
        assert_eq!(records[0].position.map(|p| p.x), Some(120.5));
        assert_eq!(records[1].element.class_name, "nav");
    }

    #[test]
    fn test_validation_counts_missing_fields() {
        let mut bad = record(ActionType::Click, "", 4);
        bad.element.selector.clear();
        let report = validate_records(&[record(ActionType::Click, "https://a.test/", 1), bad]);

        assert_eq!(report.total_records, 2);
        assert_eq!(report.valid_records, 1);
        assert_eq!(report.invalid_records, 1);
        assert_eq!(report.missing_urls, 1);
        assert_eq!(report.missing_selectors, 1);
        assert_eq!(report.missing_xpaths, 0);
        assert_eq!(report.errors.len(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_filters_and_summary() {
        let records = vec![
            record(ActionType::Click, "https://a.test/list", 5),
            record(ActionType::Input, "https://b.test/form", 1),
            record(ActionType::Click, "https://a.test/detail", 9),
        ];

        assert_eq!(filter_by_type(&records, &[ActionType::Click]).len(), 2);
        assert_eq!(filter_by_url(&records, "b.test").len(), 1);

        let summary = summarize_records(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_type.get("click"), Some(&2));
        assert_eq!(summary.urls.len(), 3);
        let (start, end) = summary.time_range.unwrap();
        assert_eq!(start, records[1].timestamp);
        assert_eq!(end, records[2].timestamp);

        assert_eq!(summarize_records(&[]).time_range, None);
    }
}
