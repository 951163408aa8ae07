use std::collections::HashSet;

use glam::DVec3;

use crate::scene::TileScene;

/// What part of the scene to draw.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Viewpoint position in the current world frame.
    pub eye: DVec3,
    /// Cells drawn on each side of the eye.
    pub half_extent: i64,
    pub cell_size: f64,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: DVec3::ZERO,
            half_extent: 8,
            cell_size: 1.0,
        }
    }
}

/// Renderer-agnostic interface. Renderers only read the scene.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &TileScene, view: &RenderView) -> Self::Output;
}

/// Top-down ASCII map of the tiles around the eye.
///
/// `@` marks the eye, `#` a live tile and `.` an empty cell. Rows run from
/// -Z (top) to +Z.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &TileScene, view: &RenderView) -> String {
        let occupied: HashSet<(i64, i64)> = scene
            .tiles()
            .map(|(_, tile)| {
                let rel = (tile.position - view.eye) / view.cell_size;
                (rel.x.round() as i64, rel.z.round() as i64)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&format!(
            "=== Tile Scene (tiles={}, created={}, destroyed={}, shifts={}) ===\n",
            scene.len(),
            scene.created(),
            scene.destroyed(),
            scene.shifts()
        ));
        out.push_str(&format!(
            "Eye: ({:.2}, {:.2}, {:.2})\n",
            view.eye.x, view.eye.y, view.eye.z
        ));

        let h = view.half_extent;
        for dz in -h..=h {
            let row: String = (-h..=h)
                .map(|dx| match (dx, dz) {
                    (0, 0) => '@',
                    _ if occupied.contains(&(dx, dz)) => '#',
                    _ => '.',
                })
                .collect();
            out.push_str(&row);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatgrid_stream::{ChunkStreamer, StreamConfig};

    fn map_rows(output: &str) -> Vec<&str> {
        output.lines().skip(2).collect()
    }

    #[test]
    fn empty_scene_draws_only_eye() {
        let view = RenderView {
            half_extent: 2,
            ..RenderView::default()
        };
        let output = DebugTextRenderer::new().render(&TileScene::new(), &view);

        assert!(output.contains("tiles=0"));
        let rows = map_rows(&output);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[2], "..@..");
    }

    #[test]
    fn streamed_disc_is_drawn_around_eye() {
        let mut streamer = ChunkStreamer::unbounded(StreamConfig::default()).unwrap();
        let mut scene = TileScene::new();
        let mut eye = DVec3::ZERO;
        streamer.tick(&mut scene, &mut eye).unwrap();

        let view = RenderView {
            eye,
            half_extent: 6,
            cell_size: 1.0,
        };
        let output = DebugTextRenderer::new().render(&scene, &view);
        let rows = map_rows(&output);

        assert_eq!(rows.len(), 13);
        let tiles: usize = rows.iter().map(|r| r.matches('#').count()).sum();
        assert_eq!(tiles, 80);
        assert_eq!(rows[6], ".#####@#####.");
        assert_eq!(rows[0], ".............");
    }

    #[test]
    fn map_follows_eye_after_origin_shift() {
        let mut streamer = ChunkStreamer::unbounded(StreamConfig::default()).unwrap();
        let mut scene = TileScene::new();
        let mut eye = DVec3::new(12_000.0, 0.0, 0.0);
        let report = streamer.tick(&mut scene, &mut eye).unwrap();
        assert!(report.shift().is_some());
        assert_eq!(scene.shifts(), 1);

        let view = RenderView {
            eye,
            half_extent: 5,
            cell_size: 1.0,
        };
        let output = DebugTextRenderer::new().render(&scene, &view);
        assert_eq!(map_rows(&output)[5], "#####@#####");
    }
}
