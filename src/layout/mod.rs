//! Render coordinates for a hierarchy tree
//!
//! Assigns every card an (x, y) position for the graphics layer: cards
//! group into generation rows, each row is centered around x = 0 and
//! siblings sit a fixed width apart. Known collisions are corrected
//! through a configurable separation table instead of special cases in
//! the placement code.

use crate::family::SerNo;
use crate::hierarchy::HierarchyNode;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A render coordinate; y grows downward one row per generation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Manual x-axis nudge for two members that land next to each other on
/// a row without being a couple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSeparation {
    pub left: SerNo,
    pub right: SerNo,
    pub gap: f64,
}

impl PairSeparation {
    pub fn new(left: impl Into<SerNo>, right: impl Into<SerNo>, gap: f64) -> Self {
        PairSeparation {
            left: left.into(),
            right: right.into(),
            gap,
        }
    }
}

/// Row geometry plus the separation patch table.
///
/// The default table carries the one observed collision, members 15
/// and 16.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Vertical distance between generation rows
    #[serde(default = "default_level_height")]
    pub level_height: f64,

    /// Horizontal slot width per card
    #[serde(default = "default_member_width")]
    pub member_width: f64,

    #[serde(default)]
    pub separations: Vec<PairSeparation>,
}

fn default_level_height() -> f64 {
    200.0
}

fn default_member_width() -> f64 {
    180.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            level_height: default_level_height(),
            member_width: default_member_width(),
            separations: vec![PairSeparation::new(15u32, 16u32, 120.0)],
        }
    }
}

impl LayoutConfig {
    /// Default geometry with an empty separation table
    pub fn plain() -> Self {
        LayoutConfig {
            separations: Vec::new(),
            ..LayoutConfig::default()
        }
    }

    pub fn with_separation(
        mut self,
        left: impl Into<SerNo>,
        right: impl Into<SerNo>,
        gap: f64,
    ) -> Self {
        self.separations.push(PairSeparation::new(left, right, gap));
        self
    }
}

/// Compute render coordinates for every card in the tree.
///
/// Cards group into rows by generation level; a card without one
/// (pre-nested input) falls back to its tree depth, the root sitting
/// at depth 1. Each row orders ascending by serial number, centers
/// around x = 0 and sits at y = level × level_height. A separation
/// entry applies only when both of its members landed on the same row.
/// A serial number appearing more than once keeps its first placement.
pub fn compute_layout(tree: &HierarchyNode, config: &LayoutConfig) -> HashMap<SerNo, Position> {
    let mut rows: BTreeMap<u32, Vec<SerNo>> = BTreeMap::new();
    let mut seen: FxHashSet<SerNo> = FxHashSet::default();
    tree.for_each_card(|card, depth| {
        if seen.insert(card.ser_no) {
            let level = card.level.unwrap_or(depth as u32);
            rows.entry(level).or_default().push(card.ser_no);
        }
    });

    let mut positions = HashMap::with_capacity(seen.len());
    let mut row_of: FxHashMap<SerNo, u32> = FxHashMap::default();
    for (&level, row) in rows.iter_mut() {
        row.sort_unstable();
        let row_width = row.len() as f64 * config.member_width;
        let start_x = -row_width / 2.0;
        let y = f64::from(level) * config.level_height;
        for (index, &ser_no) in row.iter().enumerate() {
            let x = start_x + index as f64 * config.member_width + config.member_width / 2.0;
            positions.insert(ser_no, Position { x, y });
            row_of.insert(ser_no, level);
        }
    }

    for separation in &config.separations {
        let (Some(left_row), Some(right_row)) =
            (row_of.get(&separation.left), row_of.get(&separation.right))
        else {
            continue;
        };
        if left_row != right_row {
            continue;
        }
        if let Some(position) = positions.get_mut(&separation.left) {
            position.x -= separation.gap;
        }
        if let Some(position) = positions.get_mut(&separation.right) {
            position.x += separation.gap;
        }
    }

    positions
}
