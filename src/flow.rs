//! Application loop.
//!
//! [`run`] opens the window and drives the desk scene through winit's
//! [`ApplicationHandler`]: the scene is prepared once on resume, every redraw
//! pushes the camera, replays the draw sequence and presents, and the
//! registered textures are released when the loop exits.

use std::{iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::SceneConfig,
    context::Context,
    data_structures::texture::Texture,
    renderer::{FrameTarget, GpuRenderer},
    scene::SceneManager,
    view::ViewContext,
};

pub struct AppState {
    pub(crate) ctx: Context,
    renderer: GpuRenderer,
    scene: SceneManager<Texture>,
    view: ViewContext,
    clear_colour: wgpu::Color,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &SceneConfig) -> anyhow::Result<Self> {
        let mut ctx = Context::new(window).await?;
        let size = ctx.window().inner_size();
        ctx.resize(size.width, size.height);

        let mut renderer = GpuRenderer::new(&ctx.device, &ctx.queue, ctx.config.format);
        let mut scene = SceneManager::new();
        let report = scene.prepare_scene(&mut renderer, config)?;
        for failure in &report.texture_failures {
            log::warn!("Texture `{}` unavailable: {}", failure.tag, failure.error);
        }
        if !report.is_clean() {
            log::warn!(
                "Scene prepared with problems: {} missing textures, {} flat-shaded objects, {} dropped objects",
                report.texture_failures.len(),
                report.fallback_objects.len(),
                report.dropped_objects.len()
            );
        }

        Ok(Self {
            view: ViewContext::new(ctx.config.width, ctx.config.height),
            ctx,
            renderer,
            scene,
            clear_colour: config.clear_colour,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    fn render(&mut self, dt: f32) -> Result<(), wgpu::CurrentSurfaceTexture> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.ctx.is_surface_configured() {
            return Ok(());
        }

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(texture)
            | wgpu::CurrentSurfaceTexture::Suboptimal(texture) => texture,
            other => return Err(other),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Err(err) = self.view.prepare_scene_view(&mut self.renderer, dt) {
            log::error!("Camera uniforms rejected: {err}");
        }
        let drawn = self.scene.render_scene(&mut self.renderer);
        log::trace!("Recorded {drawn} draws");

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.renderer.flush(
            &mut encoder,
            &FrameTarget {
                color: &view,
                depth: &self.ctx.depth_texture.view,
                clear_colour: self.clear_colour,
            },
        );
        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: SceneConfig,
    state: Option<AppState>,
    last_time: Instant,
}

impl App {
    fn new(config: SceneConfig) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            config,
            state: None,
            last_time: Instant::now(),
        })
    }
}

impl ApplicationHandler<()> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create the window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self
            .async_runtime
            .block_on(AppState::new(window, &self.config))
        {
            Ok(state) => {
                self.state = Some(state);
                self.last_time = Instant::now();
            }
            Err(e) => {
                log::error!("App initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.view.handle_window_event(&event);
        if state.view.exit_requested() {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(dt.as_secs_f32()) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {:?}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.scene.destroy(&mut state.renderer);
            log::info!("Scene resources released");
        }
    }
}

pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop: EventLoop<()> = EventLoop::with_user_event().build()?;
    let mut app = App::new(config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
