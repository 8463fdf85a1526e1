//! Software scene render: one ray per output pixel against every panel.

use glam::{Mat3, Vec3};
use image::{Rgba, RgbaImage};

use crate::camera::PerspectiveCamera;
use crate::scene::{SceneModel, PANEL_HEIGHT, PANEL_WIDTH};
use crate::texture::{pixel_center, sample_bilinear};

/// A panel placed in world space, ready for ray tests.
struct PlacedPanel<'a> {
    /// Panel centre in world space.
    origin: Vec3,
    /// Inverse of the group rotation.
    to_local: Mat3,
    masked: bool,
    texture: &'a RgbaImage,
}

struct Hit {
    depth: f32,
    color: [f32; 4],
    alpha: f32,
}

fn place_panels(scene: &SceneModel) -> Vec<PlacedPanel<'_>> {
    let mut placed = Vec::new();
    for group in scene.groups() {
        let rotation = group.rotation();
        let to_world = Mat3::from_rotation_x(rotation.x) * Mat3::from_rotation_y(rotation.y);
        let group_origin = Vec3::new(group.offset_x(), 0.0, 0.0);
        for panel in group.panels() {
            placed.push(PlacedPanel {
                origin: group_origin + to_world * Vec3::new(0.0, 0.0, panel.depth),
                to_local: to_world.transpose(),
                masked: panel.masked,
                texture: group.texture(),
            });
        }
    }
    placed
}

impl PlacedPanel<'_> {
    fn intersect(
        &self,
        eye: Vec3,
        direction: Vec3,
        near: f32,
        far: f32,
        mask: &RgbaImage,
    ) -> Option<Hit> {
        let local_eye = self.to_local * (eye - self.origin);
        let local_dir = self.to_local * direction;
        // the front face looks down +Z; anything else is culled
        if local_dir.z >= 0.0 {
            return None;
        }
        let t = -local_eye.z / local_dir.z;
        if !(near..=far).contains(&t) {
            return None;
        }
        let point = local_eye + local_dir * t;
        let u = point.x / PANEL_WIDTH + 0.5;
        let v = 0.5 - point.y / PANEL_HEIGHT;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        let color = sample_bilinear(self.texture, u, v);
        let mut alpha = color[3] / 255.0;
        if self.masked {
            alpha *= sample_bilinear(mask, u, v)[1] / 255.0;
        }
        Some(Hit {
            depth: t,
            color,
            alpha,
        })
    }
}

/// Renders `scene` through `camera` into a fresh `width` x `height` image.
///
/// Opaque layers are depth tested first; masked layers in front of the
/// nearest opaque hit are then blended back to front over it.
pub fn render_scene(
    scene: &SceneModel,
    camera: &PerspectiveCamera,
    (width, height): (u32, u32),
) -> RgbaImage {
    let panels = place_panels(scene);
    let eye = camera.position;
    let mask = scene.mask();
    let mut blended: Vec<Hit> = Vec::with_capacity(panels.len());

    RgbaImage::from_fn(width, height, |x, y| {
        let [u, v] = pixel_center(x, y, width, height);
        let direction = camera.ray_direction(u * 2.0 - 1.0, 1.0 - v * 2.0);

        let mut depth_limit = camera.far();
        let mut color = [0.0, 0.0, 0.0];
        blended.clear();

        for panel in &panels {
            let Some(hit) = panel.intersect(eye, direction, camera.near(), depth_limit, mask)
            else {
                continue;
            };
            if panel.masked {
                blended.push(hit);
            } else {
                depth_limit = hit.depth;
                color = [hit.color[0], hit.color[1], hit.color[2]];
            }
        }

        blended.retain(|hit| hit.depth < depth_limit && hit.alpha > 0.0);
        blended.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        for hit in &blended {
            for channel in 0..3 {
                color[channel] = color[channel] * (1.0 - hit.alpha) + hit.color[channel] * hit.alpha;
            }
        }

        Rgba([
            color[0].round().clamp(0.0, 255.0) as u8,
            color[1].round().clamp(0.0, 255.0) as u8,
            color[2].round().clamp(0.0, 255.0) as u8,
            255,
        ])
    })
}
