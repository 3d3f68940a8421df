use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use orbit_tracer::cli::Cli;
use orbit_tracer::gpu::{GpuContext, KernelSource, SurfaceDisplay, WgpuCompute};
use orbit_tracer::input::{Command, InputMapper};
use orbit_tracer::timer::RedrawTimer;
use orbit_tracer::{Renderer, Scene};

type PathTracer = Renderer<WgpuCompute, SurfaceDisplay>;

struct App {
    cli: Cli,
    scene: Option<Scene>,
    renderer: Option<PathTracer>,
    input: InputMapper,
    timer: RedrawTimer,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, scene: Scene) -> Self {
        let timer = RedrawTimer::new(cli.frame_interval(), Instant::now());
        Self {
            cli,
            scene: Some(scene),
            renderer: None,
            input: InputMapper::default(),
            timer,
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop, scene: Scene) -> Result<PathTracer> {
        let settings = self.cli.render_settings();
        settings.pixel_count()?;

        // Create window at the render resolution
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("Orbit Tracer")
                        .with_inner_size(winit::dpi::PhysicalSize::new(
                            settings.width,
                            settings.height,
                        )),
                )
                .context("Failed to create window")?,
        );

        // Initialize GPU
        let gpu = pollster::block_on(GpuContext::new(window.clone(), self.cli.adapter.as_deref()))
            .context("Failed to initialize GPU")?;
        let adapter_name = gpu.adapter_info().name;
        let adapter = gpu.adapter().clone();
        let device = gpu.device().clone();
        let queue = gpu.queue().clone();
        let surface = gpu.into_surface();

        // Compute kernel and its buffers
        let kernel = KernelSource::from_path(self.cli.kernel.clone());
        let compute = WgpuCompute::new(
            device.clone(),
            queue.clone(),
            &kernel,
            settings.width,
            settings.height,
            &scene.to_gpu(),
        )
        .context("Failed to set up the path tracing kernel")?;

        // Display pipeline over the kernel output
        let mut display = SurfaceDisplay::new(
            window,
            surface,
            &adapter,
            device,
            queue,
            compute.output_view(),
        );
        if !self.cli.no_ui {
            display = display.with_overlay(adapter_name, scene.len());
        }

        info!(
            "Path tracer initialized: {}x{}, {} spheres",
            settings.width,
            settings.height,
            scene.len()
        );

        Ok(Renderer::new(compute, display, scene, settings))
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(renderer) = &self.renderer {
            renderer.display().window().request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(scene) = self.scene.take() else {
            return;
        };

        match self.init(event_loop, scene) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        // Overlay first; consumed events still end drags but issue no commands
        if renderer.display_mut().handle_event(&event) {
            self.input.observe_consumed(&event);
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => renderer.display_mut().resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Err(err) = renderer.render_frame() {
                    self.fail(event_loop, anyhow::Error::new(err).context("Render failed"));
                }
            }
            event => {
                let mut changed = false;
                for command in self.input.process_event(&event) {
                    match command {
                        Command::Camera(action) => {
                            renderer.apply(action);
                            changed = true;
                        }
                        Command::ResetCamera => {
                            renderer.reset_camera();
                            changed = true;
                        }
                        Command::Exit => event_loop.exit(),
                    }
                }
                if changed {
                    self.request_redraw();
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.timer.poll(Instant::now()) {
            self.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.timer.deadline()));
    }
}

fn load_scene(cli: &Cli) -> Result<Scene> {
    match cli.scene_path() {
        Some(path) => {
            info!("Loading scene: {}", path.display());
            Scene::load(&path).with_context(|| format!("Failed to load scene {}", path.display()))
        }
        None => {
            info!("Loading scene: default");
            Ok(Scene::default())
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let scene = load_scene(&cli)?;

    if cli.dump_scene {
        println!("{}", scene.to_json()?);
        return Ok(());
    }

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(cli, scene);

    info!("Controls: WASD move, arrows orbit, mouse drag orbit/raise/zoom, Space reset, Escape quit");
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
