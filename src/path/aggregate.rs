//! Record aggregation
//!
//! Collapses runs of consecutive interactions with the same table into one
//! grouped node. Everything else becomes a single node.

use crate::records::{ActionRecord, ActionType, TableInfo};
use chrono::{DateTime, Utc};

/// Unit of the path visualization
#[derive(Debug, Clone, PartialEq)]
pub enum AggregatedNode {
    Single(ActionRecord),
    TableGroup(TableGroup),
}

/// Consecutive records on the same table
#[derive(Debug, Clone, PartialEq)]
pub struct TableGroup {
    /// Table descriptor of the first member
    pub table: TableInfo,
    records: Vec<ActionRecord>,
}

impl TableGroup {
    fn seed(record: ActionRecord, table: TableInfo) -> Self {
        Self {
            table,
            records: vec![record],
        }
    }

    /// Non-empty by construction
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn first(&self) -> &ActionRecord {
        &self.records[0]
    }

    pub fn last(&self) -> &ActionRecord {
        &self.records[self.records.len() - 1]
    }
}

impl AggregatedNode {
    pub fn is_group(&self) -> bool {
        matches!(self, AggregatedNode::TableGroup(_))
    }

    /// Member records in capture order
    pub fn records(&self) -> &[ActionRecord] {
        match self {
            AggregatedNode::Single(record) => std::slice::from_ref(record),
            AggregatedNode::TableGroup(group) => group.records(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Timestamp of the first member
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            AggregatedNode::Single(record) => record.timestamp,
            AggregatedNode::TableGroup(group) => group.first().timestamp,
        }
    }

    /// Timestamp of the last member
    pub fn end_timestamp(&self) -> DateTime<Utc> {
        match self {
            AggregatedNode::Single(record) => record.timestamp,
            AggregatedNode::TableGroup(group) => group.last().timestamp,
        }
    }

    /// Action type of a single node; groups have none
    pub fn action(&self) -> Option<ActionType> {
        match self {
            AggregatedNode::Single(record) => Some(record.action),
            AggregatedNode::TableGroup(_) => None,
        }
    }

    pub fn table(&self) -> Option<&TableInfo> {
        match self {
            AggregatedNode::Single(record) => record.table(),
            AggregatedNode::TableGroup(group) => Some(&group.table),
        }
    }
}

/// Aggregate a capture-ordered record list into path nodes
pub fn aggregate(records: &[ActionRecord]) -> Vec<AggregatedNode> {
    let mut nodes = Vec::new();
    let mut open: Option<TableGroup> = None;

    for record in records {
        match record.table() {
            Some(table) => {
                if let Some(group) = open.as_mut() {
                    if group.table.xpath == table.xpath {
                        group.records.push(record.clone());
                        continue;
                    }
                }
                if let Some(group) = open.take() {
                    nodes.push(AggregatedNode::TableGroup(group));
                }
                open = Some(TableGroup::seed(record.clone(), table.clone()));
            }
            None => {
                if let Some(group) = open.take() {
                    nodes.push(AggregatedNode::TableGroup(group));
                }
                nodes.push(AggregatedNode::Single(record.clone()));
            }
        }
    }

    if let Some(group) = open {
        nodes.push(AggregatedNode::TableGroup(group));
    }

    nodes
}

/// Concatenate node members back into the capture-ordered record list
pub fn flatten(nodes: &[AggregatedNode]) -> Vec<ActionRecord> {
    nodes.iter().flat_map(|n| n.records().iter().cloned()).collect()
}

/// Node counts for the summary panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCounts {
    pub nodes: usize,
    pub table_groups: usize,
    pub singles: usize,
    pub actions: usize,
}

pub fn count_nodes(nodes: &[AggregatedNode]) -> NodeCounts {
    let table_groups = nodes.iter().filter(|n| n.is_group()).count();
    NodeCounts {
        nodes: nodes.len(),
        table_groups,
        singles: nodes.len() - table_groups,
        actions: nodes.iter().map(AggregatedNode::len).sum(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{cell, plain};
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_groups_consecutive_same_table() {
        let records = vec![
            cell("tableA", 0, 0, 0),
            cell("tableA", 0, 1, 1),
            plain(ActionType::Input, "x", 2),
        ];
        let nodes = aggregate(&records);

        assert_eq!(nodes.len(), 2);
        match &nodes[0] {
            AggregatedNode::TableGroup(group) => {
                assert_eq!(group.count(), 2);
                assert_eq!(group.table.display_name(), "tableA");
            }
            other => panic!("expected group, got {:?}", other),
        }
        assert!(matches!(&nodes[1], AggregatedNode::Single(r) if r.element.id == "x"));
    }

    #[test]
    fn test_different_tables_not_merged() {
        let nodes = aggregate(&[cell("tableA", 0, 0, 0), cell("tableB", 0, 0, 1)]);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.is_group() && n.len() == 1));
    }

    #[test]
    fn test_interruption_starts_new_group() {
        let nodes = aggregate(&[
            cell("tableA", 0, 0, 0),
            plain(ActionType::Click, "btn", 1),
            cell("tableA", 1, 0, 2),
        ]);
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].is_group());
        assert!(!nodes[1].is_group());
        assert!(nodes[2].is_group());
    }

    #[test]
    fn test_lone_table_record_is_group_of_one() {
        let nodes = aggregate(&[cell("tableA", 2, 2, 0)]);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_group());
        assert_eq!(nodes[0].len(), 1);
    }

    #[test]
    fn test_counts_and_timestamps() {
        let nodes = aggregate(&[
            cell("tableA", 0, 0, 0),
            cell("tableA", 0, 1, 5),
            plain(ActionType::Submit, "form", 9),
        ]);
        let counts = count_nodes(&nodes);
        assert_eq!(
            counts,
            NodeCounts { nodes: 2, table_groups: 1, singles: 1, actions: 3 }
        );
        assert_eq!(nodes[0].timestamp(), fixtures::at(0));
        assert_eq!(nodes[0].end_timestamp(), fixtures::at(5));
        assert_eq!(nodes[1].action(), Some(ActionType::Submit));
        assert_eq!(nodes[0].action(), None);
    }
}
