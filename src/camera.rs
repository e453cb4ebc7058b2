use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use winit::{
    event::{ElementState, MouseScrollDelta},
    keyboard::KeyCode,
};

/// cgmath builds OpenGL clip space (z in -1..1), wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const PITCH_LIMIT_DEGREES: f32 = 89.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 80.0;
pub const MIN_SPEED: f32 = 0.5;
/// Speed change per second while an arrow key is held.
const SPEED_STEP: f32 = 0.5;
const PIXELS_PER_SCROLL_LINE: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Fly camera driven by yaw and pitch.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    front: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    world_up: Vector3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new((0.0, 5.0, 12.0), (0.0, -0.5, -2.0), (0.0, 1.0, 0.0))
    }
}

impl Camera {
    /// Camera at `position` looking along `front`. Yaw and pitch are derived
    /// from the direction so later mouse input continues from it smoothly.
    pub fn new<P: Into<Point3<f32>>, V: Into<Vector3<f32>>>(position: P, front: V, world_up: V) -> Self {
        let front = front.into().normalize();
        let yaw = Deg::from(Rad(front.z.atan2(front.x)));
        let pitch = Deg::from(Rad(front.y.clamp(-1.0, 1.0).asin()));
        let mut camera = Self {
            position: position.into(),
            front,
            up: Vector3::unit_y(),
            right: Vector3::unit_x(),
            world_up: world_up.into().normalize(),
            yaw,
            pitch,
            zoom: MAX_ZOOM,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front, self.up)
    }

    pub fn process_movement(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.up * velocity,
            CameraMovement::Down => self.position -= self.up * velocity,
        }
    }

    /// Turn the camera by a cursor offset in pixels. Pitch stays within ±89°.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += Deg(x_offset * self.mouse_sensitivity);
        self.pitch += Deg(y_offset * self.mouse_sensitivity);
        self.pitch = Deg(self.pitch.0.clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES));
        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (sin_yaw, cos_yaw) = Rad::from(self.yaw).0.sin_cos();
        let (sin_pitch, cos_pitch) = Rad::from(self.pitch).0.sin_cos();
        self.front = Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Clone, Debug)]
pub struct Projection {
    width: u32,
    height: u32,
    pub mode: ProjectionMode,
    znear: f32,
    zfar: f32,
}

impl Projection {
    /// Half of the visible width in orthographic mode.
    pub const ORTHO_HALF_WIDTH: f32 = 10.0;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            mode: ProjectionMode::default(),
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Projection in wgpu clip space. `zoom` is the vertical field of view in
    /// degrees and only matters in perspective mode.
    pub fn calc_matrix(&self, zoom: f32) -> Matrix4<f32> {
        let projection = match self.mode {
            ProjectionMode::Perspective => perspective(Deg(zoom), self.aspect(), self.znear, self.zfar),
            ProjectionMode::Orthographic => {
                let half_width = Self::ORTHO_HALF_WIDTH;
                let half_height = half_width / self.aspect();
                cgmath::ortho(-half_width, half_width, -half_height, half_height, self.znear, self.zfar)
            }
        };
        OPENGL_TO_WGPU_MATRIX * projection
    }
}

/// What a key press asks of the application besides moving the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerAction {
    None,
    Exit,
    SetProjection(ProjectionMode),
}

/// Collects keyboard and mouse input between frames and applies it to a
/// [`Camera`] in [`CameraController::update`].
#[derive(Clone, Debug, Default)]
pub struct CameraController {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    faster: bool,
    slower: bool,
    last_cursor: Option<(f64, f64)>,
    rotate: (f32, f32),
    scroll: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_key(&mut self, key: KeyCode, state: ElementState) -> ControllerAction {
        let pressed = state == ElementState::Pressed;
        match key {
            KeyCode::KeyW => self.forward = pressed,
            KeyCode::KeyS => self.backward = pressed,
            KeyCode::KeyA => self.left = pressed,
            KeyCode::KeyD => self.right = pressed,
            KeyCode::KeyQ => self.up = pressed,
            KeyCode::KeyE => self.down = pressed,
            KeyCode::ArrowUp => self.faster = pressed,
            KeyCode::ArrowDown => self.slower = pressed,
            KeyCode::KeyP if pressed => return ControllerAction::SetProjection(ProjectionMode::Perspective),
            KeyCode::KeyO if pressed => return ControllerAction::SetProjection(ProjectionMode::Orthographic),
            KeyCode::Escape if pressed => return ControllerAction::Exit,
            _ => {}
        }
        ControllerAction::None
    }

    /// Feed an absolute cursor position. The first sample only sets the
    /// reference point, later ones turn into offsets with Y pointing up.
    pub fn process_cursor(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_cursor {
            self.rotate.0 += (x - last_x) as f32;
            self.rotate.1 += (last_y - y) as f32;
        }
        self.last_cursor = Some((x, y));
    }

    /// Forget the reference point, e.g. after the cursor left the window.
    pub fn reset_cursor(&mut self) {
        self.last_cursor = None;
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_SCROLL_LINE,
        };
    }

    pub fn update(&mut self, camera: &mut Camera, dt: f32) {
        if self.faster {
            camera.movement_speed += SPEED_STEP * dt;
        }
        if self.slower {
            camera.movement_speed = (camera.movement_speed - SPEED_STEP * dt).max(MIN_SPEED);
        }

        let held = [
            (self.forward, CameraMovement::Forward),
            (self.backward, CameraMovement::Backward),
            (self.left, CameraMovement::Left),
            (self.right, CameraMovement::Right),
            (self.up, CameraMovement::Up),
            (self.down, CameraMovement::Down),
        ];
        for (active, direction) in held {
            if active {
                camera.process_movement(direction, dt);
            }
        }

        let (x, y) = std::mem::take(&mut self.rotate);
        if x != 0.0 || y != 0.0 {
            camera.process_mouse_movement(x, y);
        }
        let scroll = std::mem::take(&mut self.scroll);
        if scroll != 0.0 {
            camera.process_mouse_scroll(scroll);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn default_camera_looks_down_at_the_desk() {
        let camera = Camera::default();
        assert_eq!(camera.position, Point3::new(0.0, 5.0, 12.0));
        let expected = Vector3::new(0.0, -0.5, -2.0).normalize();
        assert!(close(camera.front().x, expected.x));
        assert!(close(camera.front().y, expected.y));
        assert!(close(camera.front().z, expected.z));
        assert!(close(camera.yaw().0, -90.0));
        assert!(camera.pitch().0 < 0.0);
        assert_eq!(camera.zoom, 80.0);
        assert_eq!(camera.movement_speed, 2.5);
        // up stays perpendicular to front
        assert!(close(camera.up().dot(camera.front()), 0.0));
    }

    #[test]
    fn movement_scales_with_speed_and_time() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), (0.0, 0.0, -1.0), (0.0, 1.0, 0.0));
        camera.movement_speed = 4.0;
        camera.process_movement(CameraMovement::Forward, 0.5);
        assert!(close(camera.position.z, -2.0));
        camera.process_movement(CameraMovement::Right, 0.25);
        assert!(close(camera.position.x, 1.0));
        camera.process_movement(CameraMovement::Up, 1.0);
        assert!(close(camera.position.y, 4.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(camera.pitch(), Deg(89.0));
        camera.process_mouse_movement(0.0, -100_000.0);
        assert_eq!(camera.pitch(), Deg(-89.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(-5.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.process_mouse_scroll(30.0);
        assert_eq!(camera.zoom, 50.0);
        camera.process_mouse_scroll(500.0);
        assert_eq!(camera.zoom, MIN_ZOOM);
    }

    #[test]
    fn first_cursor_sample_is_suppressed_and_y_is_inverted() {
        let mut controller = CameraController::new();
        let mut camera = Camera::new((0.0, 0.0, 0.0), (0.0, 0.0, -1.0), (0.0, 1.0, 0.0));
        controller.process_cursor(500.0, 400.0);
        controller.update(&mut camera, 0.016);
        assert!(close(camera.yaw().0, -90.0));
        assert!(close(camera.pitch().0, 0.0));

        // moving the mouse up looks up
        controller.process_cursor(510.0, 380.0);
        controller.update(&mut camera, 0.016);
        assert!(close(camera.yaw().0, -89.0));
        assert!(close(camera.pitch().0, 2.0));
    }

    #[test]
    fn arrow_keys_change_speed_with_a_floor() {
        let mut controller = CameraController::new();
        let mut camera = Camera::default();
        controller.process_key(KeyCode::ArrowUp, ElementState::Pressed);
        controller.update(&mut camera, 2.0);
        assert!(close(camera.movement_speed, 3.5));
        controller.process_key(KeyCode::ArrowUp, ElementState::Released);
        controller.process_key(KeyCode::ArrowDown, ElementState::Pressed);
        controller.update(&mut camera, 100.0);
        assert_eq!(camera.movement_speed, MIN_SPEED);
    }

    #[test]
    fn held_keys_move_until_released() {
        let mut controller = CameraController::new();
        let mut camera = Camera::new((0.0, 0.0, 0.0), (0.0, 0.0, -1.0), (0.0, 1.0, 0.0));
        controller.process_key(KeyCode::KeyW, ElementState::Pressed);
        controller.update(&mut camera, 1.0);
        controller.update(&mut camera, 1.0);
        assert!(close(camera.position.z, -5.0));
        controller.process_key(KeyCode::KeyW, ElementState::Released);
        controller.update(&mut camera, 1.0);
        assert!(close(camera.position.z, -5.0));
    }

    #[test]
    fn mode_and_exit_keys() {
        let mut controller = CameraController::new();
        assert_eq!(
            controller.process_key(KeyCode::KeyO, ElementState::Pressed),
            ControllerAction::SetProjection(ProjectionMode::Orthographic)
        );
        assert_eq!(
            controller.process_key(KeyCode::KeyP, ElementState::Pressed),
            ControllerAction::SetProjection(ProjectionMode::Perspective)
        );
        assert_eq!(controller.process_key(KeyCode::KeyP, ElementState::Released), ControllerAction::None);
        assert_eq!(controller.process_key(KeyCode::Escape, ElementState::Pressed), ControllerAction::Exit);
    }

    #[test]
    fn orthographic_projection_keeps_the_aspect_ratio() {
        let mut projection = Projection::new(1000, 800);
        projection.mode = ProjectionMode::Orthographic;
        let matrix = projection.calc_matrix(45.0);
        // a point on the right edge of the view volume maps to x = 1
        let edge = matrix * Vector4::new(10.0, 8.0, -1.0, 1.0);
        assert!(close(edge.x / edge.w, 1.0));
        assert!(close(edge.y / edge.w, 1.0));
    }

    #[test]
    fn projected_depth_is_in_wgpu_range() {
        let projection = Projection::new(1000, 800);
        let matrix = projection.calc_matrix(80.0);
        let near = matrix * Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = matrix * Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!(close(near.z / near.w, 0.0));
        assert!(close(far.z / far.w, 1.0));
    }

    #[test]
    fn view_matrix_moves_the_eye_to_the_origin() {
        let camera = Camera::default();
        let eye = camera.view_matrix() * camera.position.to_homogeneous();
        assert!(close(eye.x, 0.0) && close(eye.y, 0.0) && close(eye.z, 0.0));
        assert!(camera.view_matrix().invert().is_some());
    }
}
