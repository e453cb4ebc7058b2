//! Camera state owned by the application loop.
//!
//! [`ViewContext`] bundles the fly camera, its input controller and the
//! projection. Window events go in through [`ViewContext::handle_window_event`],
//! and [`ViewContext::prepare_scene_view`] pushes `view`, `projection` and
//! `viewPosition` once per frame.

use winit::{
    event::{KeyEvent, WindowEvent},
    keyboard::PhysicalKey,
};

use crate::{
    camera::{Camera, CameraController, ControllerAction, Projection, ProjectionMode},
    uniforms::{self, UniformError, UniformSink},
};

#[derive(Clone, Debug)]
pub struct ViewContext {
    pub camera: Camera,
    pub controller: CameraController,
    pub projection: Projection,
    exit_requested: bool,
}

impl ViewContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            camera: Camera::default(),
            controller: CameraController::new(),
            projection: Projection::new(width, height),
            exit_requested: false,
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.projection.mode
    }

    /// Feed a window event to the camera. Returns `true` when the event was used.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                match self.controller.process_key(*code, *state) {
                    ControllerAction::Exit => {
                        log::info!("Escape pressed, closing the scene");
                        self.exit_requested = true;
                    }
                    ControllerAction::SetProjection(mode) => {
                        if self.projection.mode != mode {
                            log::debug!("Switching to {mode:?} projection");
                        }
                        self.projection.mode = mode;
                    }
                    ControllerAction::None => {}
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.controller.process_cursor(position.x, position.y);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.controller.reset_cursor();
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.controller.process_scroll(delta);
                true
            }
            WindowEvent::Resized(size) => {
                self.projection.resize(size.width, size.height);
                false
            }
            _ => false,
        }
    }

    /// Apply the input gathered since the last frame and push the camera
    /// uniforms.
    pub fn prepare_scene_view(
        &mut self,
        sink: &mut impl UniformSink,
        dt: f32,
    ) -> Result<(), UniformError> {
        self.controller.update(&mut self.camera, dt);
        sink.set_uniform(uniforms::VIEW, self.camera.view_matrix().into())?;
        sink.set_uniform(
            uniforms::PROJECTION,
            self.projection.calc_matrix(self.camera.zoom).into(),
        )?;
        sink.set_uniform(uniforms::VIEW_POSITION, self.camera.position.into())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use winit::{dpi::PhysicalSize, event::MouseScrollDelta};

    use super::*;
    use crate::uniforms::{RecordingSink, UniformValue};

    #[test]
    fn pushes_view_projection_and_position() {
        let mut view = ViewContext::new(1000, 800);
        let mut sink = RecordingSink::new();
        view.prepare_scene_view(&mut sink, 0.016).unwrap();

        let names: Vec<_> = sink.pushes().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, [uniforms::VIEW, uniforms::PROJECTION, uniforms::VIEW_POSITION]);
        assert_eq!(
            sink.last(uniforms::VIEW_POSITION),
            Some(&UniformValue::Vec3([0.0, 5.0, 12.0]))
        );
        assert_eq!(
            sink.last(uniforms::VIEW),
            Some(&UniformValue::Mat4(view.camera.view_matrix().into()))
        );
    }

    #[test]
    fn projection_follows_mode_and_zoom() {
        let mut view = ViewContext::new(1000, 800);
        let mut sink = RecordingSink::new();
        view.prepare_scene_view(&mut sink, 0.0).unwrap();
        let perspective = *sink.last(uniforms::PROJECTION).unwrap();

        view.controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 35.0));
        view.prepare_scene_view(&mut sink, 0.0).unwrap();
        let zoomed = *sink.last(uniforms::PROJECTION).unwrap();
        assert_ne!(perspective, zoomed);
        assert_eq!(view.camera.zoom, 45.0);

        view.projection.mode = ProjectionMode::Orthographic;
        view.prepare_scene_view(&mut sink, 0.0).unwrap();
        assert_eq!(
            sink.last(uniforms::PROJECTION),
            Some(&UniformValue::Mat4(view.projection.calc_matrix(1.0).into()))
        );
    }

    #[test]
    fn resize_changes_the_aspect_ratio() {
        let mut view = ViewContext::new(1000, 800);
        assert!(!view.handle_window_event(&WindowEvent::Resized(PhysicalSize::new(800, 800))));
        assert_eq!(view.projection.aspect(), 1.0);
    }

    #[test]
    fn missing_sink_is_ignored() {
        let mut view = ViewContext::new(640, 480);
        let mut sink: Option<RecordingSink> = None;
        assert!(view.prepare_scene_view(&mut sink, 0.1).is_ok());
    }
}
