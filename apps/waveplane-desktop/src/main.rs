use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use waveplane_kernel::{FrameDriver, PlaneGeometry, RippleParams};
use waveplane_render_wgpu::{OrbitCamera, WaveplaneRenderer};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// The plane sits below the camera target and spins slowly around its
/// local normal.
const PLANE_DROP: f32 = 10.0;
const SPIN_PER_FRAME: f32 = 0.005;

#[derive(Parser)]
#[command(name = "waveplane-desktop", about = "Animated rippling plane viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Plane subdivisions per side
    #[arg(long, default_value_t = 25)]
    segments: u32,

    /// Plane extent in world units
    #[arg(long, default_value_t = 100.0)]
    extent: f32,
}

/// Scene state: the surface, its driver, the camera, and panel bindings.
struct SceneState {
    mesh: PlaneGeometry,
    driver: FrameDriver,
    /// Live tuning values. `None` until the render context exists.
    params: Option<RippleParams>,
    flat_shading: bool,
    spin: f32,
    camera: OrbitCamera,
    // Input state
    rotating: bool,
    last_cursor: Option<(f64, f64)>,
}

impl SceneState {
    fn new(mesh: PlaneGeometry) -> Self {
        Self {
            mesh,
            driver: FrameDriver::new(),
            params: None,
            flat_shading: false,
            spin: 0.0,
            camera: OrbitCamera::default(),
            rotating: false,
            last_cursor: None,
        }
    }

    /// Advance one frame: spin, camera, then the ripple driver.
    fn frame(&mut self) {
        self.spin += SPIN_PER_FRAME;
        self.camera.update();
        let params = self.params;
        self.driver.drive(&mut self.mesh, params.as_ref());
    }

    fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, -PLANE_DROP, 0.0))
            * Mat4::from_rotation_x(-FRAC_PI_2)
            * Mat4::from_rotation_z(self.spin)
    }

    fn handle_cursor(&mut self, x: f64, y: f64) {
        if let Some((lx, ly)) = self.last_cursor {
            if self.rotating {
                self.camera.inject_rotate((x - lx) as f32, (y - ly) as f32);
            }
        }
        self.last_cursor = Some((x, y));
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.driver.panel_attached() {
            return;
        }
        let Some(params) = &mut self.params else {
            return;
        };

        egui::SidePanel::right("tuning")
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Ripple");
                ui.separator();

                let mut width = params.width();
                if ui
                    .add(egui::Slider::new(&mut width, RippleParams::WIDTH_RANGE).text("Width"))
                    .changed()
                {
                    params.set_width(width);
                }
                let mut height = params.height();
                if ui
                    .add(egui::Slider::new(&mut height, RippleParams::HEIGHT_RANGE).text("Height"))
                    .changed()
                {
                    params.set_height(height);
                }
                let mut speed = params.speed();
                if ui
                    .add(egui::Slider::new(&mut speed, RippleParams::SPEED_RANGE).text("Speed"))
                    .changed()
                {
                    params.set_speed(speed);
                }

                ui.separator();
                ui.checkbox(&mut self.flat_shading, "Flat shading");

                ui.separator();
                ui.label(format!("t = {:.2}", self.driver.clock().time()));
                ui.small("Drag: orbit | Scroll: zoom");
            });
    }
}

struct GpuApp {
    state: SceneState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WaveplaneRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: SceneState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Waveplane")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("waveplane_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.camera.aspect = size.width as f32 / size.height.max(1) as f32;

        let renderer = WaveplaneRenderer::new(
            &device,
            &queue,
            surface_format,
            size.width,
            size.height,
            &self.state.mesh,
        );

        // The evaluation context now exists; the tuning values go live and
        // the panel attaches on the next frame.
        self.state.params = Some(RippleParams::default());

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.camera.aspect =
                        config.width as f32 / config.height.max(1) as f32;
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.rotating = btn_state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.handle_cursor(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                self.state.camera.inject_zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.state.frame();

                if self.state.params.is_some() && self.state.driver.attach_panel_once() {
                    tracing::info!("tuning panel attached");
                }

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.camera,
                        &self.state.mesh,
                        self.state.model_matrix(),
                        self.state.flat_shading,
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
                    {
                        let mut pass = encoder
                            .begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("egui_pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Load,
                                        store: wgpu::StoreOp::Store,
                                    },
                                })],
                                depth_stencil_attachment: None,
                                ..Default::default()
                            })
                            .forget_lifetime();
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
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

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("waveplane-desktop starting");

    let mesh = PlaneGeometry::new(cli.extent, cli.extent, cli.segments, cli.segments)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(SceneState::new(mesh));
    event_loop.run_app(&mut app)?;

    Ok(())
}
