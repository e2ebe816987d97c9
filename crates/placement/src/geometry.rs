//! Grid cell <-> visual position transforms.
//!
//! Both directions consume the same `ZoneGridConfig` segment regions, so a
//! cell placed by `cell_to_position` always maps back to itself through
//! `position_to_cell`. Columns use centered bucket spacing: a segment with
//! `n` columns places column `k` at fraction `(2k - 1) / 2n` of its region,
//! which leaves equal gaps before, between, and after the tokens.
//!
//! Device classes differ only in the space the math runs in. Desktop uses the
//! live container size. Mobile computes in fixed reference dimensions and the
//! whole layout is scaled to the container, not reflowed; pointer input is
//! mapped into reference space before bucketing.

use bevy::math::Vec2;

use crate::types::GridCell;
use crate::zones::{SegmentAxis, ZoneGridConfig};

/// Reference dimensions the mobile layout was authored against.
pub const MOBILE_REF_SIZE: Vec2 = Vec2::new(390.0, 560.0);

/// Token size bounds in layout pixels.
pub const TOKEN_MIN_SIZE: f32 = 24.0;
pub const TOKEN_MAX_SIZE: f32 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

/// Container size + device class, computed once per frame and passed into
/// every transform call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponsiveContext {
    /// Current container size in screen pixels.
    pub size: Vec2,
    pub device: DeviceClass,
}

impl ResponsiveContext {
    pub fn new(size: Vec2, device: DeviceClass) -> Self {
        Self { size, device }
    }

    /// The space layout math runs in: live size on desktop, fixed reference
    /// dimensions on mobile.
    pub fn layout_size(&self) -> Vec2 {
        match self.device {
            DeviceClass::Desktop => self.size,
            DeviceClass::Mobile => MOBILE_REF_SIZE,
        }
    }

    /// Uniform factor from layout space to screen space.
    pub fn scale(&self) -> f32 {
        match self.device {
            DeviceClass::Desktop => 1.0,
            DeviceClass::Mobile => (self.size.x / MOBILE_REF_SIZE.x)
                .min(self.size.y / MOBILE_REF_SIZE.y)
                .max(f32::EPSILON),
        }
    }

    /// Map a container-relative screen point into layout space.
    pub fn to_layout(&self, point: Vec2) -> Vec2 {
        point / self.scale()
    }

    /// Map a layout-space point back to container-relative screen space.
    pub fn to_screen(&self, point: Vec2) -> Vec2 {
        point * self.scale()
    }
}

/// Centered bucket fraction: slot `index` (1-based) of `count`.
fn slot_fraction(index: u8, count: u8) -> f32 {
    (2.0 * f32::from(index) - 1.0) / (2.0 * f32::from(count))
}

/// Layout-space position of a cell, or `None` if the cell is not valid in
/// this zone.
pub fn cell_to_position(
    config: &ZoneGridConfig,
    cell: GridCell,
    ctx: &ResponsiveContext,
) -> Option<Vec2> {
    if !config.contains(cell) {
        return None;
    }
    let segment = config.segment_for_row(cell.row)?;
    let along = slot_fraction(cell.col, segment.cols);
    let cross = slot_fraction(cell.row - segment.first_row + 1, segment.row_count());

    let region = &segment.region;
    let (fx, fy) = match segment.axis {
        SegmentAxis::Horizontal => (
            region.x0 + along * region.width(),
            region.y0 + cross * region.height(),
        ),
        SegmentAxis::Vertical => (
            region.x0 + cross * region.width(),
            region.y0 + along * region.height(),
        ),
    };

    let size = ctx.layout_size();
    Some(Vec2::new(fx * size.x, fy * size.y))
}

/// Inverse transform: container-relative pointer position to grid cell.
///
/// The pointer is bucketed with `floor` inside the segment region it falls
/// into. A bucket that lands on a masked column is snapped to the nearest
/// valid neighbor column (one column of allowance) before giving up.
pub fn position_to_cell(
    config: &ZoneGridConfig,
    pointer: Vec2,
    ctx: &ResponsiveContext,
) -> Option<GridCell> {
    let layout = ctx.to_layout(pointer);
    let size = ctx.layout_size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }
    let fx = layout.x / size.x;
    let fy = layout.y / size.y;

    let segment = config.segments.iter().find(|s| s.region.contains(fx, fy))?;
    let region = &segment.region;

    let (along_rel, cross_rel) = match segment.axis {
        SegmentAxis::Horizontal => (
            (fx - region.x0) / region.width(),
            (fy - region.y0) / region.height(),
        ),
        SegmentAxis::Vertical => (
            (fy - region.y0) / region.height(),
            (fx - region.x0) / region.width(),
        ),
    };

    let raw = along_rel * f32::from(segment.cols);
    let col = (raw.floor() as i32 + 1).clamp(1, i32::from(segment.cols)) as u8;
    let row_index = (cross_rel * f32::from(segment.row_count())).floor() as i32;
    let row = segment.first_row + row_index.clamp(0, i32::from(segment.row_count()) - 1) as u8;

    if config.is_valid_column(row, col) {
        return Some(GridCell::new(row, col));
    }

    // One column of adjustment allowance, preferring the side the pointer
    // leans toward.
    let remainder = raw - raw.floor();
    let neighbors = if remainder >= 0.5 {
        [i32::from(col) + 1, i32::from(col) - 1]
    } else {
        [i32::from(col) - 1, i32::from(col) + 1]
    };
    for candidate in neighbors {
        if candidate >= 1
            && candidate <= i32::from(segment.cols)
            && config.is_valid_column(row, candidate as u8)
        {
            return Some(GridCell::new(row, candidate as u8));
        }
    }
    None
}

/// Token size for a zone: available span divided by column count, clamped.
pub fn token_size(config: &ZoneGridConfig, ctx: &ResponsiveContext) -> f32 {
    let size = ctx.layout_size();
    let spacing = config
        .segments
        .iter()
        .map(|s| {
            let span = match s.axis {
                SegmentAxis::Horizontal => s.region.width() * size.x,
                SegmentAxis::Vertical => s.region.height() * size.y,
            };
            span / f32::from(s.cols)
        })
        .fold(f32::INFINITY, f32::min);
    (spacing * 0.7).clamp(TOKEN_MIN_SIZE, TOKEN_MAX_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ZoneId;
    use crate::zones::zone_config;

    fn contexts() -> Vec<ResponsiveContext> {
        vec![
            ResponsiveContext::new(Vec2::new(960.0, 640.0), DeviceClass::Desktop),
            ResponsiveContext::new(Vec2::new(1280.0, 820.0), DeviceClass::Desktop),
            ResponsiveContext::new(Vec2::new(414.0, 700.0), DeviceClass::Mobile),
            ResponsiveContext::new(Vec2::new(360.0, 540.0), DeviceClass::Mobile),
        ]
    }

    #[test]
    fn test_round_trip_every_valid_cell() {
        for zone in ZoneId::ALL {
            let config = zone_config(zone);
            for ctx in contexts() {
                for cell in config.valid_cells() {
                    let pos = cell_to_position(config, cell, &ctx)
                        .unwrap_or_else(|| panic!("no position for {zone:?} {cell:?}"));
                    let screen = ctx.to_screen(pos);
                    let back = position_to_cell(config, screen, &ctx);
                    assert_eq!(back, Some(cell), "{zone:?} {cell:?} via {ctx:?}");
                }
            }
        }
    }

    #[test]
    fn test_invalid_cell_has_no_position() {
        let config = zone_config(ZoneId::Harborwalk);
        let ctx = ResponsiveContext::new(Vec2::new(960.0, 640.0), DeviceClass::Desktop);
        assert_eq!(cell_to_position(config, GridCell::new(2, 5), &ctx), None);
        assert_eq!(cell_to_position(config, GridCell::new(9, 1), &ctx), None);
    }

    #[test]
    fn test_pointer_outside_regions_is_none() {
        let config = zone_config(ZoneId::Plaza);
        let ctx = ResponsiveContext::new(Vec2::new(960.0, 640.0), DeviceClass::Desktop);
        assert_eq!(position_to_cell(config, Vec2::new(2.0, 2.0), &ctx), None);
        assert_eq!(position_to_cell(config, Vec2::new(958.0, 638.0), &ctx), None);
    }

    #[test]
    fn test_masked_edge_column_snaps_to_neighbor() {
        let config = zone_config(ZoneId::Harborwalk);
        let ctx = ResponsiveContext::new(Vec2::new(1000.0, 800.0), DeviceClass::Desktop);
        // A pointer over masked (2,5) snaps to the adjacent valid column 4.
        let masked_pos = {
            let segment = config.segment_for_row(2).unwrap();
            let region = &segment.region;
            let fx = region.x0 + (2.0 * 5.0 - 1.0) / 10.0 * region.width();
            let fy = region.y0 + 0.75 * region.height();
            Vec2::new(fx * 1000.0, fy * 800.0)
        };
        assert_eq!(
            position_to_cell(config, masked_pos, &ctx),
            Some(GridCell::new(2, 4))
        );
    }

    #[test]
    fn test_doubly_masked_column_gives_up() {
        let config = zone_config(ZoneId::Harborwalk);
        let ctx = ResponsiveContext::new(Vec2::new(1000.0, 800.0), DeviceClass::Desktop);
        // (3,1) is masked and so is its only in-range neighbor (3,2).
        let segment = config.segment_for_row(3).unwrap();
        let region = &segment.region;
        let fy = region.y0 + (2.0 * 1.0 - 1.0) / 8.0 * region.height();
        let fx = region.x0 + 0.25 * region.width();
        let pos = Vec2::new(fx * 1000.0, fy * 800.0);
        assert_eq!(position_to_cell(config, pos, &ctx), None);
    }

    #[test]
    fn test_token_size_clamped() {
        for zone in ZoneId::ALL {
            let config = zone_config(zone);
            for ctx in contexts() {
                let size = token_size(config, &ctx);
                assert!((TOKEN_MIN_SIZE..=TOKEN_MAX_SIZE).contains(&size));
            }
        }
    }

    #[test]
    fn test_mobile_layout_is_scaled_not_reflowed() {
        let config = zone_config(ZoneId::Plaza);
        let small = ResponsiveContext::new(Vec2::new(360.0, 540.0), DeviceClass::Mobile);
        let large = ResponsiveContext::new(Vec2::new(414.0, 700.0), DeviceClass::Mobile);
        let cell = GridCell::new(1, 3);
        // Layout-space positions are identical regardless of container size.
        assert_eq!(
            cell_to_position(config, cell, &small),
            cell_to_position(config, cell, &large)
        );
    }
}
