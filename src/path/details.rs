//! Detail panel and tooltip content

use super::aggregate::{count_nodes, AggregatedNode, TableGroup};
use crate::records::{ActionRecord, TableInfo};
use chrono::{DateTime, Local, Utc};

/// One labelled row of the detail panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

impl DetailField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Content of the detail panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub title: String,
    pub fields: Vec<DetailField>,
    /// Member actions of a table group, one line each
    pub members: Vec<String>,
}

impl DetailPanel {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

/// Panel shown when nothing is selected
pub fn summary_panel(nodes: &[AggregatedNode]) -> DetailPanel {
    let counts = count_nodes(nodes);
    let mut fields = vec![
        DetailField::new("Nodes", counts.nodes.to_string()),
        DetailField::new("Table groups", counts.table_groups.to_string()),
        DetailField::new("Single actions", counts.singles.to_string()),
        DetailField::new("Total actions", counts.actions.to_string()),
    ];

    if let (Some(first), Some(last)) = (nodes.first(), nodes.last()) {
        let start = first.timestamp();
        let end = last.timestamp();
        fields.push(DetailField::new("Started", format_time(start)));
        fields.push(DetailField::new("Ended", format_time(end)));
        fields.push(DetailField::new("Duration", format_span(start, end)));
    }

    DetailPanel {
        title: "Path summary".to_string(),
        fields,
        members: Vec::new(),
    }
}

/// Panel for the selected node
pub fn node_panel(index: usize, node: &AggregatedNode) -> DetailPanel {
    match node {
        AggregatedNode::Single(record) => single_panel(index, record),
        AggregatedNode::TableGroup(group) => group_panel(group),
    }
}

fn group_panel(group: &TableGroup) -> DetailPanel {
    let table = &group.table;
    let mut fields = vec![
        DetailField::new("Table", table.display_name()),
        DetailField::new("Actions", group.count().to_string()),
        DetailField::new("Dimensions", format_dimensions(table)),
        DetailField::new(
            "Time",
            format!(
                "{} – {}",
                format_time(group.first().timestamp),
                format_time(group.last().timestamp)
            ),
        ),
    ];
    if !table.id.is_empty() {
        fields.push(DetailField::new("Table id", table.id.clone()));
    }
    fields.push(DetailField::new("Table XPath", table.xpath.clone()));
    fields.push(DetailField::new("Table selector", table.selector.clone()));

    let members = group
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let cell = record
                .table()
                .and_then(|t| t.element_position)
                .map(|p| format!(" r{}c{}", p.row, p.column))
                .unwrap_or_default();
            format!("{}. {}{} · {}", i + 1, record.action.label(), cell, record.description)
        })
        .collect();

    DetailPanel {
        title: format!("▦ {}", table.display_name()),
        fields,
        members,
    }
}

fn single_panel(index: usize, record: &ActionRecord) -> DetailPanel {
    let mut fields = vec![
        DetailField::new("Type", record.action.label()),
        DetailField::new("Description", record.description.clone()),
        DetailField::new("Time", format_time(record.timestamp)),
    ];
    if !record.url.is_empty() {
        fields.push(DetailField::new("URL", record.url.clone()));
    }
    fields.push(DetailField::new("XPath", record.element.xpath.clone()));
    fields.push(DetailField::new("Selector", record.element.selector.clone()));
    if let Some(value) = &record.value {
        fields.push(DetailField::new("Value", value.clone()));
    }

    if let Some(table) = record.table() {
        fields.push(DetailField::new("Table", table.display_name()));
        if let Some(pos) = table.element_position {
            fields.push(DetailField::new(
                "Cell",
                format!("row {}, column {}", pos.row, pos.column),
            ));
        }
        fields.push(DetailField::new("Table XPath", table.xpath.clone()));
    }

    DetailPanel {
        title: format!("#{} {}", index + 1, record.action.label()),
        fields,
        members: Vec::new(),
    }
}

/// Hover tooltip lines for a node
pub fn tooltip_lines(index: usize, node: &AggregatedNode) -> Vec<String> {
    match node {
        AggregatedNode::Single(record) => vec![
            format!("#{} {}", index + 1, record.action.label()),
            record.description.clone(),
            format_time(record.timestamp),
        ],
        AggregatedNode::TableGroup(group) => vec![
            format!("▦ {}", group.table.display_name()),
            format!("{} actions", group.count()),
            format!(
                "{} – {}",
                format_time(group.first().timestamp),
                format_time(group.last().timestamp)
            ),
        ],
    }
}

fn format_dimensions(table: &TableInfo) -> String {
    format!(
        "{} rows × {} columns ({} cells)",
        table.rows,
        table.columns(),
        table.cells
    )
}

fn format_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Human-readable duration between two timestamps
pub fn format_span(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let secs = (end - start).num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::aggregate::{aggregate, fixtures};
    use crate::records::ActionType;

    fn nodes() -> Vec<AggregatedNode> {
        let mut input = fixtures::plain(ActionType::Input, "q", 95);
        input.element.table = Some(TableInfo::new("/html/body/table[2]").at_cell(1, 3));
        aggregate(&[
            fixtures::cell("orders", 0, 0, 0),
            fixtures::cell("orders", 1, 2, 30),
            fixtures::plain(ActionType::Click, "save", 60),
            input,
        ])
    }

    #[test]
    fn test_summary_counts_and_span() {
        // The trailing input carries table context, so it is a one-member group
        let panel = summary_panel(&nodes());
        assert_eq!(panel.field("Nodes"), Some("3"));
        assert_eq!(panel.field("Table groups"), Some("2"));
        assert_eq!(panel.field("Single actions"), Some("1"));
        assert_eq!(panel.field("Total actions"), Some("4"));
        assert_eq!(panel.field("Duration"), Some("1m 35s"));
    }

    #[test]
    fn test_empty_summary_has_no_span() {
        let panel = summary_panel(&[]);
        assert_eq!(panel.field("Nodes"), Some("0"));
        assert_eq!(panel.field("Duration"), None);
    }

    #[test]
    fn test_group_panel() {
        let nodes = nodes();
        let panel = node_panel(0, &nodes[0]);
        assert_eq!(panel.field("Table"), Some("orders"));
        assert_eq!(panel.field("Actions"), Some("2"));
        assert_eq!(panel.field("Dimensions"), Some("3 rows × 3 columns (9 cells)"));
        assert_eq!(panel.members.len(), 2);
        assert!(panel.members[1].starts_with("2. Click r2c3"));
    }

    #[test]
    fn test_single_panel() {
        let nodes = nodes();
        let panel = node_panel(1, &nodes[1]);
        assert_eq!(panel.title, "#2 Click");
        assert_eq!(panel.field("Selector"), Some("#save"));
        assert_eq!(panel.field("Table"), None);
    }

    #[test]
    fn test_single_with_table_context() {
        let mut record = fixtures::plain(ActionType::Change, "sel", 0);
        record.element.table = Some(TableInfo::new("/t").at_cell(0, 0));
        let panel = node_panel(0, &AggregatedNode::Single(record));
        assert_eq!(panel.field("Table"), Some("unnamed table"));
        assert_eq!(panel.field("Cell"), Some("row 1, column 1"));
    }

    #[test]
    fn test_tooltip_lines() {
        let nodes = nodes();
        let lines = tooltip_lines(0, &nodes[0]);
        assert_eq!(lines[0], "▦ orders");
        assert_eq!(lines[1], "2 actions");
        assert_eq!(tooltip_lines(1, &nodes[1])[0], "#2 Click");
    }

    #[test]
    fn test_format_span() {
        let t0 = fixtures::at(0);
        assert_eq!(format_span(t0, fixtures::at(42)), "42s");
        assert_eq!(format_span(t0, fixtures::at(3725)), "1h 2m 5s");
        assert_eq!(format_span(fixtures::at(10), t0), "0s");
    }
}
