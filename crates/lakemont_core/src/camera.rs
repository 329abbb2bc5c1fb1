use glam::{Mat3, Mat4, Vec3};

/// First-person walk camera.
///
/// Keeps an explicit right/up/look basis so movement is expressed relative to
/// where the viewer faces: `walk` moves along the look vector, `strafe` along
/// the right vector, `pitch`/`rotate_y` tilt and turn the basis.  The view
/// matrix is rebuilt lazily — mutators only set a dirty flag, and
/// [`Camera::update_view_matrix`] re-orthonormalises the basis once per frame.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    right: Vec3,
    up: Vec3,
    look: Vec3,
    view_dirty: bool,
    view: Mat4,

    // ── projection parameters ─────────────────────────────────────────────
    pub fovy: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            right: Vec3::X,
            up: Vec3::Y,
            look: Vec3::NEG_Z,
            view_dirty: true,
            view: Mat4::IDENTITY,
            fovy: std::f32::consts::FRAC_PI_4,
            aspect: 1.0,
            znear: 1.0,
            zfar: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.view_dirty = true;
    }

    /// Sets the perspective frustum.  Called at startup and on every resize.
    pub fn set_lens(&mut self, fovy: f32, aspect: f32, znear: f32, zfar: f32) {
        self.fovy = fovy;
        self.aspect = aspect;
        self.znear = znear;
        self.zfar = zfar;
    }

    /// Moves `distance` units along the look vector.
    pub fn walk(&mut self, distance: f32) {
        self.position += self.look * distance;
        self.view_dirty = true;
    }

    /// Moves `distance` units along the right vector.
    pub fn strafe(&mut self, distance: f32) {
        self.position += self.right * distance;
        self.view_dirty = true;
    }

    /// Tilts the view up or down by `angle` radians around the right vector.
    pub fn pitch(&mut self, angle: f32) {
        let rot = Mat3::from_axis_angle(self.right, -angle);
        self.up = rot * self.up;
        self.look = rot * self.look;
        self.view_dirty = true;
    }

    /// Turns the whole basis around the world Y axis by `angle` radians.
    pub fn rotate_y(&mut self, angle: f32) {
        let rot = Mat3::from_rotation_y(-angle);
        self.right = rot * self.right;
        self.up = rot * self.up;
        self.look = rot * self.look;
        self.view_dirty = true;
    }

    /// Re-orthonormalises the basis and rebuilds the view matrix if any
    /// mutator ran since the last call.
    pub fn update_view_matrix(&mut self) {
        if !self.view_dirty {
            return;
        }
        self.look = self.look.normalize();
        self.up = self.right.cross(self.look).normalize();
        self.right = self.look.cross(self.up);
        self.view = Mat4::look_to_rh(self.position, self.look, self.up);
        self.view_dirty = false;
    }

    /// The view matrix as of the last [`Camera::update_view_matrix`] call.
    pub fn view(&self) -> Mat4 {
        debug_assert!(!self.view_dirty, "view matrix read before update");
        self.view
    }

    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_moves_along_look() {
        let mut cam = Camera::new();
        cam.walk(3.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, -3.0));
        cam.strafe(2.0);
        assert_eq!(cam.position(), Vec3::new(2.0, 0.0, -3.0));
    }

    #[test]
    fn rotate_y_keeps_basis_orthonormal() {
        let mut cam = Camera::new();
        cam.rotate_y(1.3);
        cam.pitch(0.4);
        cam.update_view_matrix();
        // extract the rebuilt basis through the public view matrix: a view
        // matrix built from an orthonormal basis has determinant 1
        assert!((cam.view().determinant() - 1.0).abs() < 1e-4);
    }
}
