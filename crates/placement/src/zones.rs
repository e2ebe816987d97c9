//! Static per-zone grid topology.
//!
//! Each zone is described by one or more `GridSegment`s. A rectangular zone
//! has a single segment; an L-shaped zone has a horizontal and a vertical one.
//! Segment regions (container fractions) are the only place grid geometry is
//! declared: both transform directions in `geometry` read from here, so the
//! forward and inverse mappings cannot drift apart.

use crate::types::{GridCell, ZoneId};

/// Which container axis the column index runs along within a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAxis {
    /// Columns run left-to-right; rows stack top-to-bottom.
    Horizontal,
    /// Columns run top-to-bottom; rows stack left-to-right.
    Vertical,
}

/// A rectangular sub-area of the layout container, in [0, 1] fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Region {
    pub fn contains(&self, fx: f32, fy: f32) -> bool {
        fx >= self.x0 && fx < self.x1 && fy >= self.y0 && fy < self.y1
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// One straight run of the grid.
#[derive(Debug, Clone, Copy)]
pub struct GridSegment {
    /// First grid row covered by this segment (1-based, inclusive).
    pub first_row: u8,
    /// Last grid row covered by this segment (inclusive).
    pub last_row: u8,
    /// Number of columns in this segment.
    pub cols: u8,
    pub axis: SegmentAxis,
    /// Area of the container this segment occupies. Regions of a zone's
    /// segments must not overlap.
    pub region: Region,
}

impl GridSegment {
    pub fn row_count(&self) -> u8 {
        self.last_row - self.first_row + 1
    }

    pub fn covers_row(&self, row: u8) -> bool {
        row >= self.first_row && row <= self.last_row
    }
}

/// Topology tag, mostly informational; cell validity goes through
/// `ZoneGridConfig::is_valid_column` regardless of shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridShape {
    Rectangular,
    LShaped,
}

/// Immutable geometry descriptor for one zone.
#[derive(Debug, Clone, Copy)]
pub struct ZoneGridConfig {
    pub zone: ZoneId,
    pub shape: GridShape,
    pub segments: &'static [GridSegment],
    /// Cells masked out of the grid (e.g. to keep a corner clear).
    pub masked: &'static [GridCell],
}

impl ZoneGridConfig {
    pub fn max_rows(&self) -> u8 {
        self.segments.iter().map(|s| s.last_row).max().unwrap_or(0)
    }

    pub fn segment_for_row(&self, row: u8) -> Option<&'static GridSegment> {
        self.segments.iter().find(|s| s.covers_row(row))
    }

    /// Single source of truth for cell validity: the row must belong to a
    /// segment, the column must be within that segment's range, and the cell
    /// must not be masked.
    pub fn is_valid_column(&self, row: u8, col: u8) -> bool {
        let Some(segment) = self.segment_for_row(row) else {
            return false;
        };
        if col < 1 || col > segment.cols {
            return false;
        }
        !self.masked.contains(&GridCell::new(row, col))
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.is_valid_column(cell.row, cell.col)
    }

    /// All valid cells of the zone, row-major.
    pub fn valid_cells(&self) -> Vec<GridCell> {
        let mut cells = Vec::new();
        for segment in self.segments {
            for row in segment.first_row..=segment.last_row {
                for col in 1..=segment.cols {
                    if self.is_valid_column(row, col) {
                        cells.push(GridCell::new(row, col));
                    }
                }
            }
        }
        cells
    }
}

// ---------------------------------------------------------------------------
// Zone definitions
// ---------------------------------------------------------------------------

/// Plaza: plain 2x6 grid in the middle band of the container.
static PLAZA: ZoneGridConfig = ZoneGridConfig {
    zone: ZoneId::Plaza,
    shape: GridShape::Rectangular,
    segments: &[GridSegment {
        first_row: 1,
        last_row: 2,
        cols: 6,
        axis: SegmentAxis::Horizontal,
        region: Region {
            x0: 0.08,
            y0: 0.10,
            x1: 0.92,
            y1: 0.90,
        },
    }],
    masked: &[],
};

/// Harborwalk: L-shaped promenade. Rows 1-2 run along the top, rows 3-4 run
/// down the right edge. Row 2 loses its last column and row 3 its first two
/// so tokens never sit on the corner artwork.
static HARBORWALK: ZoneGridConfig = ZoneGridConfig {
    zone: ZoneId::Harborwalk,
    shape: GridShape::LShaped,
    segments: &[
        GridSegment {
            first_row: 1,
            last_row: 2,
            cols: 5,
            axis: SegmentAxis::Horizontal,
            region: Region {
                x0: 0.06,
                y0: 0.08,
                x1: 0.94,
                y1: 0.50,
            },
        },
        GridSegment {
            first_row: 3,
            last_row: 4,
            cols: 4,
            axis: SegmentAxis::Vertical,
            region: Region {
                x0: 0.56,
                y0: 0.52,
                x1: 0.94,
                y1: 0.96,
            },
        },
    ],
    masked: &[
        GridCell::new(2, 5),
        GridCell::new(3, 1),
        GridCell::new(3, 2),
    ],
};

/// Geometry descriptor for a zone. Configs are static and never mutated.
pub fn zone_config(zone: ZoneId) -> &'static ZoneGridConfig {
    match zone {
        ZoneId::Plaza => &PLAZA,
        ZoneId::Harborwalk => &HARBORWALK,
    }
}
