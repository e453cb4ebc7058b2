use desk_scene::{
    camera::{OPENGL_TO_WGPU_MATRIX, ProjectionMode},
    view::ViewContext,
};
use winit::{dpi::PhysicalSize, event::{MouseScrollDelta, WindowEvent}};

use crate::common::test_utils::FakeBackend;

mod common;

#[test]
fn frame_uniforms_follow_the_camera() {
    let mut view = ViewContext::new(1000, 800);
    let mut backend = FakeBackend::new();

    view.prepare_scene_view(&mut backend, 0.016).unwrap();

    let frame = backend.uniforms.frame;
    assert_eq!(frame.view_position, Into::<[f32; 3]>::into(view.camera.position));
    assert_eq!(frame.view, Into::<[[f32; 4]; 4]>::into(view.camera.view_matrix()));
    assert_ne!(frame.projection, Into::<[[f32; 4]; 4]>::into(OPENGL_TO_WGPU_MATRIX));
}

#[test]
fn scrolling_narrows_the_perspective() {
    let mut view = ViewContext::new(1000, 800);
    let mut backend = FakeBackend::new();
    view.prepare_scene_view(&mut backend, 0.0).unwrap();
    let before = backend.uniforms.frame.projection;

    view.controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 2.0));
    view.prepare_scene_view(&mut backend, 0.0).unwrap();

    // a smaller field of view scales x and y up
    assert!(backend.uniforms.frame.projection[0][0] > before[0][0]);
    assert_eq!(view.projection_mode(), ProjectionMode::Perspective);
}

#[test]
fn resize_changes_the_aspect_but_is_left_to_the_surface() {
    let mut view = ViewContext::new(1000, 800);
    let mut backend = FakeBackend::new();
    view.prepare_scene_view(&mut backend, 0.0).unwrap();
    let before = backend.uniforms.frame.projection;

    let used = view.handle_window_event(&WindowEvent::Resized(PhysicalSize::new(500, 800)));
    view.prepare_scene_view(&mut backend, 0.0).unwrap();

    assert!(!used);
    assert!(backend.uniforms.frame.projection[0][0] > before[0][0]);
    assert_eq!(backend.uniforms.frame.projection[1][1], before[1][1]);
}
