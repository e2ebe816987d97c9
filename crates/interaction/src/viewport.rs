//! Responsive map context.
//!
//! The map occupies the window below the toolbar. Its size and device class
//! are recomputed once per frame and injected into every transform call, so
//! no other component re-detects the device on its own.

use bevy::prelude::*;

use placement::geometry::{DeviceClass, ResponsiveContext};

/// Height of the toolbar strip above the map.
pub const TOP_BAR_HEIGHT: f32 = 48.0;

/// Windows narrower than this are treated as the mobile layout.
pub const MOBILE_BREAKPOINT: f32 = 700.0;

/// Current pixel rectangle of the map area, in window coordinates.
#[derive(Resource, Debug, Clone, Copy)]
pub struct MapViewport {
    pub origin: Vec2,
    pub size: Vec2,
    pub device: DeviceClass,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            origin: Vec2::new(0.0, TOP_BAR_HEIGHT),
            size: Vec2::new(1280.0, 720.0 - TOP_BAR_HEIGHT),
            device: DeviceClass::Desktop,
        }
    }
}

impl MapViewport {
    pub fn ctx(&self) -> ResponsiveContext {
        ResponsiveContext::new(self.size, self.device)
    }

    pub fn contains(&self, window_pos: Vec2) -> bool {
        window_pos.x >= self.origin.x
            && window_pos.y >= self.origin.y
            && window_pos.x < self.origin.x + self.size.x
            && window_pos.y < self.origin.y + self.size.y
    }

    /// Window coordinates to map-relative coordinates.
    pub fn to_map(&self, window_pos: Vec2) -> Vec2 {
        window_pos - self.origin
    }

    /// Layout-space position to window coordinates (for painting).
    pub fn to_window(&self, layout_pos: Vec2) -> Vec2 {
        self.origin + self.ctx().to_screen(layout_pos)
    }
}

pub fn update_map_viewport(windows: Query<&Window>, mut viewport: ResMut<MapViewport>) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let width = window.width();
    let height = window.height();
    viewport.origin = Vec2::new(0.0, TOP_BAR_HEIGHT);
    viewport.size = Vec2::new(width, (height - TOP_BAR_HEIGHT).max(1.0));
    viewport.device = if width < MOBILE_BREAKPOINT {
        DeviceClass::Mobile
    } else {
        DeviceClass::Desktop
    };
}
