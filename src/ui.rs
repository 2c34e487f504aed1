//! Debug panel for live-tuning the projection.

use crate::camera::PlayerCamera;
use crate::level::LevelConfig;

/// Numbers shown in the panel, gathered once per frame
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameStats {
    pub frame_ms: f32,
    pub total_sprites: usize,
    pub visible_sprites: usize,
}

/// Actions requested from the panel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UiActions {
    pub respawn_sprites: bool,
    pub save_snapshot: bool,
}

/// State for the debug panel
pub struct DebugPanel {
    pub visible: bool,
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Draw the panel. Edits go straight into the level settings and the
    /// player pose; the camera is rebuilt from them next frame.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        level: &mut LevelConfig,
        player: &mut PlayerCamera,
        stats: &FrameStats,
    ) -> UiActions {
        let mut actions = UiActions::default();
        if !self.visible {
            return actions;
        }

        // Horizon must stay above the bottom row
        let max_horizon = (level.viewport[1] - 1.0).max(0.0);

        egui::Window::new("Mode-7")
            .fixed_pos([10.0, 10.0])
            .min_width(220.0)
            .collapsible(true)
            .show(ctx, |ui| {
                ui.heading(&level.name);
                ui.label(format!("{:.2} ms/frame", stats.frame_ms));
                ui.label(format!("sprites: {} / {}", stats.visible_sprites, stats.total_sprites));
                ui.separator();

                ui.label(format!("origin: ({:.1}, {:.1})", player.position.x, player.position.y));
                let mut height = player.height;
                if ui.add(egui::Slider::new(&mut height, 1.0..=128.0).text("height")).changed() {
                    player.climb(height - player.height);
                }
                ui.add(egui::Slider::new(&mut player.facing_degrees, 0.0..=360.0).text("facing"));
                ui.add(egui::Slider::new(&mut level.fov_degrees, 0.0..=89.0).text("fov"));
                ui.add(egui::Slider::new(&mut level.horizon_pixel, 0.0..=max_horizon).text("horizon"));

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Respawn sprites").clicked() {
                        actions.respawn_sprites = true;
                    }
                    if ui.button("Snapshot").clicked() {
                        actions.save_snapshot = true;
                    }
                });
                ui.small("WASD/arrows move, Q/E height, F1 hides");
            });

        actions
    }
}
