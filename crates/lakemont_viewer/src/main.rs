//! Lakemont viewer: first-person walk around the lakeside monument garden.
//!
//! WASD moves, left-drag looks, Escape quits.  Every frame runs the CPU
//! update into the next frame-resource slot, records one layered render
//! pass, submits it, and stores the submission index as that slot's fence.

mod scene_content;
mod textures;

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use lakemont_core::{Camera, EngineContext, InputState, TimeClock};
use lakemont_renderer::{
    texture, DrawPass, FrameResourceRing, PipelineLayouts, SceneAssets, SceneModel,
    ScenePipelines, UpdatePass, Waves,
};

const WALK_SPEED: f32 = 10.0;
/// Look sensitivity: a quarter degree per pixel of mouse travel.
const LOOK_SPEED: f32 = 0.25;

struct Graphics {
    context: EngineContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth: wgpu::TextureView,
    camera: Camera,
    assets: SceneAssets,
    scene: SceneModel,
    waves: Waves,
    ring: FrameResourceRing,
    update: UpdatePass,
    draw: DrawPass,
}

impl Graphics {
    fn new(window: Arc<Window>, width: u32, height: u32) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let context =
            pollster::block_on(EngineContext::new_with_instance(instance, Some(&surface)))?;

        let caps = surface.get_capabilities(&context.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &config);
        let depth = texture::create_depth_target(&context.device, config.width, config.height);

        let layouts = PipelineLayouts::new(&context.device);
        let bundle = scene_content::build(&context.device, &context.queue, &layouts);
        let ring = FrameResourceRing::new(
            &context.device,
            &layouts,
            bundle.scene.item_count(),
            bundle.assets.material_count(),
            bundle.waves.vertex_count(),
        );
        let pipelines = ScenePipelines::new(&context.device, config.format, layouts);

        let mut camera = Camera::new();
        camera.set_position(glam::Vec3::new(0.0, 2.0, 0.0));
        camera.set_lens(
            std::f32::consts::FRAC_PI_4,
            config.width as f32 / config.height as f32,
            1.0,
            1000.0,
        );

        log::info!(
            "scene ready: {} items, {} materials, {} wave vertices",
            bundle.scene.item_count(),
            bundle.assets.material_count(),
            bundle.waves.vertex_count()
        );

        Ok(Self {
            context,
            surface,
            config,
            depth,
            camera,
            assets: bundle.assets,
            scene: bundle.scene,
            waves: bundle.waves,
            ring,
            update: UpdatePass::new(),
            draw: DrawPass::new(pipelines),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.context.device, &self.config);
        self.depth = texture::create_depth_target(&self.context.device, width, height);
        self.camera
            .set_lens(self.camera.fovy, width as f32 / height as f32, 1.0, 1000.0);
    }

    fn frame(&mut self, input: &mut InputState, time: lakemont_core::Time) {
        let dt = time.delta;
        if input.is_key_pressed(KeyCode::KeyW) {
            self.camera.walk(WALK_SPEED * dt);
        }
        if input.is_key_pressed(KeyCode::KeyS) {
            self.camera.walk(-WALK_SPEED * dt);
        }
        if input.is_key_pressed(KeyCode::KeyA) {
            self.camera.strafe(-WALK_SPEED * dt);
        }
        if input.is_key_pressed(KeyCode::KeyD) {
            self.camera.strafe(WALK_SPEED * dt);
        }
        let (dx, dy) = input.consume_mouse_delta();
        if input.is_button_down(MouseButton::Left) {
            self.camera.rotate_y(LOOK_SPEED.to_radians() * dx);
            self.camera.pitch(LOOK_SPEED.to_radians() * dy);
        }
        self.camera.update_view_matrix();

        self.update.run(
            &self.context.device,
            &self.context.queue,
            &time,
            &self.camera,
            (self.config.width, self.config.height),
            &mut self.scene,
            &mut self.assets,
            &mut self.waves,
            &mut self.ring,
        );

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.context.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("dropped frame: {e}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                });
        self.draw.run(
            &mut encoder,
            &view,
            &self.depth,
            &self.scene,
            &self.assets,
            self.ring.current(),
        );

        let submission = self.context.queue.submit(Some(encoder.finish()));
        self.ring.mark_submitted(submission);
        frame.present();
    }
}

#[derive(Default)]
struct Viewer {
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    input: InputState,
    clock: TimeClock,
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Lakemont")
            .with_inner_size(winit::dpi::PhysicalSize::new(1280u32, 720u32));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        match Graphics::new(window.clone(), size.width, size.height) {
            Ok(graphics) => {
                self.graphics = Some(graphics);
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("graphics init failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(gfx) = &mut self.graphics {
                    gfx.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }
                    self.input
                        .update_key(code, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input
                    .update_mouse_button(button, state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.set_mouse_position(position.x, position.y);
            }
            WindowEvent::RedrawRequested => {
                let time = self.clock.tick();
                if let Some(gfx) = &mut self.graphics {
                    gfx.frame(&mut self.input, time);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut viewer = Viewer::default();
    event_loop.run_app(&mut viewer)?;
    Ok(())
}
