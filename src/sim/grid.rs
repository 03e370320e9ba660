//! Brick wall generation
//!
//! The wall is a fixed rows × columns grid stored row-major. Each brick
//! carries an attainment status derived once from its cell, producing a
//! diagonal "Expected" frontier that sweeps from the top-right corner down
//! to the bottom-left across the interior rows.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::BrickLayout;

/// Attainment label painted on a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrickStatus {
    Above,
    Expected,
    JustBelow,
    Below,
}

impl BrickStatus {
    /// Status for a cell of a `rows × columns` grid (0-indexed).
    ///
    /// The first row is always `Above` and the last always `Below`. Interior
    /// rows compare their depth against the cell's distance from the right
    /// edge.
    pub fn for_cell(row: u32, col: u32, rows: u32, columns: u32) -> Self {
        if row == 0 {
            return BrickStatus::Above;
        }
        if row + 1 == rows {
            return BrickStatus::Below;
        }

        let depth = i64::from(row) - 1;
        let offset_from_right = i64::from(columns) - 1 - i64::from(col);
        match depth - offset_from_right {
            p if p < 0 => BrickStatus::Above,
            0 => BrickStatus::Expected,
            1 => BrickStatus::JustBelow,
            _ => BrickStatus::Below,
        }
    }
}

/// A single brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub row: u32,
    pub col: u32,
    pub rect: Rect,
    pub status: BrickStatus,
    pub destroyed: bool,
}

/// The brick wall for one round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickGrid {
    pub rows: u32,
    pub columns: u32,
    /// Row-major storage; collision scans in this order
    pub bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Lay out a fresh wall. Deterministic for a given layout.
    pub fn build(layout: &BrickLayout) -> Self {
        let capacity = (layout.rows as usize) * (layout.columns as usize);
        let mut bricks = Vec::with_capacity(capacity);

        for row in 0..layout.rows {
            for col in 0..layout.columns {
                let x = layout.left_offset + col as f32 * (layout.cell_width + layout.padding);
                let y = layout.top_offset + row as f32 * (layout.cell_height + layout.padding);
                bricks.push(Brick {
                    row,
                    col,
                    rect: Rect::new(x, y, layout.cell_width, layout.cell_height),
                    status: BrickStatus::for_cell(row, col, layout.rows, layout.columns),
                    destroyed: false,
                });
            }
        }

        Self {
            rows: layout.rows,
            columns: layout.columns,
            bricks,
        }
    }

    /// Brick at a cell, if it exists
    pub fn get(&self, row: u32, col: u32) -> Option<&Brick> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        self.bricks.get((row * self.columns + col) as usize)
    }

    pub fn remaining(&self) -> usize {
        self.bricks.iter().filter(|b| !b.destroyed).count()
    }

    /// True once every brick has been destroyed
    pub fn is_cleared(&self) -> bool {
        self.bricks.iter().all(|b| b.destroyed)
    }
}
