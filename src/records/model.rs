//! Action record schema
//!
//! Mirrors the JSON the recorder writes into local storage and into exported
//! record files. Field names on the wire are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of captured interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Click,
    Input,
    Change,
    Submit,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Click => "click",
            ActionType::Input => "input",
            ActionType::Change => "change",
            ActionType::Submit => "submit",
        }
    }

    /// Human-readable verb for labels and tables
    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Click => "Click",
            ActionType::Input => "Input",
            ActionType::Change => "Select",
            ActionType::Submit => "Submit",
        }
    }

    pub fn all() -> &'static [ActionType] {
        &[
            ActionType::Click,
            ActionType::Input,
            ActionType::Change,
            ActionType::Submit,
        ]
    }

    /// Parse from the wire name, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "click" => Some(ActionType::Click),
            "input" => Some(ActionType::Input),
            "change" => Some(ActionType::Change),
            "submit" => Some(ActionType::Submit),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured user interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "type")]
    pub action: ActionType,

    pub description: String,

    #[serde(default)]
    pub url: String,

    pub timestamp: DateTime<Utc>,

    pub element: ElementInfo,

    /// Pointer position in the viewport at capture time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PointerPosition>,

    /// Value entered or selected, for input/change actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ActionRecord {
    pub fn new(
        action: ActionType,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
        element: ElementInfo,
    ) -> Self {
        Self {
            action,
            description: description.into(),
            url: String::new(),
            timestamp,
            element,
            position: None,
            value: None,
        }
    }

    /// Builder method: set page URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Builder method: set entered value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Table context of the interacted element, if any
    pub fn table(&self) -> Option<&TableInfo> {
        self.element.table.as_ref()
    }
}

/// Structural descriptor of the interacted element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub tag_name: String,

    #[serde(default)]
    pub id: String,

    /// Raw `class` attribute
    #[serde(default, deserialize_with = "lenient_string")]
    pub class_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// `type` attribute of inputs and buttons
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,

    /// Form action, for submits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default)]
    pub xpath: String,

    #[serde(default)]
    pub selector: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableInfo>,
}

impl ElementInfo {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    /// Builder method: set element id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder method: set XPath and CSS selector
    pub fn with_paths(mut self, xpath: impl Into<String>, selector: impl Into<String>) -> Self {
        self.xpath = xpath.into();
        self.selector = selector.into();
        self
    }

    /// Builder method: attach table context
    pub fn with_table(mut self, table: TableInfo) -> Self {
        self.table = Some(table);
        self
    }

    /// Individual class names
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_name.split_whitespace()
    }
}

/// Table that contains the interacted element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    #[serde(default)]
    pub tag_name: String,

    #[serde(default)]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub class_name: String,

    /// Identity of the table; records are grouped on this
    pub xpath: String,

    #[serde(default)]
    pub selector: String,

    #[serde(default)]
    pub rows: u32,

    /// Total number of cells across all rows
    #[serde(default)]
    pub cells: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_position: Option<CellPosition>,
}

impl TableInfo {
    pub fn new(xpath: impl Into<String>) -> Self {
        Self {
            tag_name: "TABLE".to_string(),
            xpath: xpath.into(),
            ..Default::default()
        }
    }

    /// Builder method: set caption
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Builder method: set dimensions
    pub fn with_dimensions(mut self, rows: u32, cells: u32) -> Self {
        self.rows = rows;
        self.cells = cells;
        self
    }

    /// Builder method: set the interacted cell, 0-based
    pub fn at_cell(mut self, row_index: u32, cell_index: u32) -> Self {
        self.element_position = Some(CellPosition::from_indices(row_index, cell_index));
        self
    }

    /// Caption, or a placeholder for tables without one
    pub fn display_name(&self) -> &str {
        match self.caption.as_deref().map(str::trim) {
            Some(caption) if !caption.is_empty() => caption,
            _ => "unnamed table",
        }
    }

    /// Average column count; exact for rectangular tables
    pub fn columns(&self) -> u32 {
        if self.rows == 0 {
            0
        } else {
            self.cells / self.rows
        }
    }
}

/// Cell coordinates within a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPosition {
    /// 1-based, for display
    pub row: u32,
    /// 1-based, for display
    pub column: u32,
    pub row_index: u32,
    pub cell_index: u32,
}

impl CellPosition {
    pub fn from_indices(row_index: u32, cell_index: u32) -> Self {
        Self {
            row: row_index + 1,
            column: cell_index + 1,
            row_index,
            cell_index,
        }
    }
}

/// Viewport coordinates of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// String fields the page may report as other JSON values; SVG elements
/// expose `className` as an object. Anything but a string reads as empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => value,
        _ => String::new(),
    })
}
