use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod map_view;
pub mod notices;
pub mod toolbar;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                (toolbar::toolbar_ui, map_view::map_view_ui, notices::notices_ui).chain(),
            );
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
