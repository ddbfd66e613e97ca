use glam::{DMat3, DMat4, DQuat, DVec3};

use crate::assets::config::SimConfig;
use crate::renderer::instance::CameraUniform;

/// Look-at perspective camera in f64 scene space.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: DVec3,
    /// Orbit-control target.
    pub target: DVec3,
    pub up: DVec3,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    /// Width / height.
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

/// A ray in scene space. `dir` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub dir: DVec3,
}

impl Ray {
    /// Distance along the ray to the first hit with a sphere, if any.
    pub fn intersect_sphere(&self, center: DVec3, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t = if -b - sq >= 0.0 { -b - sq } else { -b + sq };
        (t >= 0.0).then_some(t)
    }

    /// Distance along the ray to the point nearest `center`, and the miss
    /// distance at that point.
    pub fn closest_approach(&self, center: DVec3) -> (f64, f64) {
        let t = (center - self.origin).dot(self.dir);
        let nearest = self.origin + self.dir * t;
        (t, nearest.distance(center))
    }
}

impl PerspectiveCamera {
    pub fn from_config(config: &SimConfig) -> Self {
        let mut camera = Self {
            position: DVec3::from_array(config.initial_camera_position),
            target: DVec3::ZERO,
            up: DVec3::Y,
            fov_y: config.fov_y_deg.to_radians(),
            aspect: 1.0,
            near: config.near,
            far: config.far,
            viewport_width: 1.0,
            viewport_height: 1.0,
        };
        camera.resize(config.viewport_width, config.viewport_height);
        camera
    }

    /// Recompute aspect for a new viewport. Tracking state is untouched.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.viewport_width = width;
        self.viewport_height = height;
        self.aspect = width / height;
    }

    pub fn distance_to_target(&self) -> f64 {
        self.position.distance(self.target)
    }

    /// World-space size of one viewport pixel at `distance` from the eye.
    pub fn world_per_pixel(&self, distance: f64) -> f64 {
        2.0 * distance * (self.fov_y / 2.0).tan() / self.viewport_height
    }

    /// Camera basis: right, up, back (+Z looks away from the target).
    fn basis(&self) -> (DVec3, DVec3, DVec3) {
        let back = (self.position - self.target).try_normalize().unwrap_or(DVec3::Z);
        // Looking straight along `up` leaves right undefined; borrow Z.
        let right = self
            .up
            .cross(back)
            .try_normalize()
            .or_else(|| DVec3::Z.cross(back).try_normalize())
            .unwrap_or(DVec3::X);
        let up = back.cross(right);
        (right, up, back)
    }

    /// World-space orientation of the camera. Billboards copy this.
    pub fn orientation(&self) -> DQuat {
        let (right, up, back) = self.basis();
        DQuat::from_mat3(&DMat3::from_cols(right, up, back)).normalize()
    }

    pub fn right(&self) -> DVec3 {
        self.basis().0
    }

    pub fn camera_up(&self) -> DVec3 {
        self.basis().1
    }

    pub fn view_matrix(&self) -> DMat4 {
        let (_, up, back) = self.basis();
        DMat4::look_to_rh(self.position, -back, up)
    }

    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a viewport pixel (origin top-left).
    pub fn pick_ray(&self, screen_x: f64, screen_y: f64) -> Ray {
        let ndc_x = 2.0 * screen_x / self.viewport_width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen_y / self.viewport_height;
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(DVec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
        Ray {
            origin: self.position,
            dir: (far - near).try_normalize().unwrap_or(-self.basis().2),
        }
    }

    /// GPU-side uniform, relative to `origin` so f32 keeps precision near
    /// the focused body.
    pub fn uniform(&self, origin: DVec3) -> CameraUniform {
        let (_, up, back) = self.basis();
        let view = DMat4::look_to_rh(self.position - origin, -back, up);
        let view_proj = (self.projection_matrix() * view).as_mat4();
        let eye = (self.position - origin).as_vec3();
        CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}
