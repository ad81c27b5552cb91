//! Serializable views of replay state, shaped for a renderer.

use serde::{Deserialize, Serialize};

use crate::player::CellRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexView {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub color: u32,
    pub highlights: Vec<u32>,
    pub last_read: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
    pub color: u32,
    pub highlights: Vec<u32>,
    pub last_read: u64,
}

/// A table with every cell already rendered by its formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub name: String,
    pub row_header: Option<String>,
    pub column_header: Option<String>,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeView {
    pub lines: Vec<String>,
    pub current_line: Option<usize>,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub pc: usize,
    pub event_count: usize,
    pub finished: bool,
    pub directed: bool,
    pub vertices: Vec<VertexView>,
    /// Half-edges to draw; undirected pairs appear once
    pub edges: Vec<EdgeView>,
    pub tables: Vec<TableView>,
    pub code: CodeView,
    pub last_table_write: Option<CellRef>,
}
