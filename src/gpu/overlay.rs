use egui::{Color32, RichText};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::orchestrator::FrameStats;

/// egui window with accumulation and camera statistics
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    adapter_name: String,
    sphere_count: usize,
}

impl Overlay {
    pub fn new(
        window: &Window,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        adapter_name: String,
        sphere_count: usize,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer =
            egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
            adapter_name,
            sphere_count,
        }
    }

    /// Returns true when egui consumed the event.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Records the overlay into `encoder`, drawn over `target`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        stats: &FrameStats,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let adapter_name = &self.adapter_name;
        let sphere_count = self.sphere_count;

        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Path Tracer")
                .title_bar(true)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .default_width(260.0)
                .show(ctx, |ui| stats_ui(ui, stats, adapter_name, sphere_count));
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let mut render_pass = render_pass.forget_lifetime();
            self.renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn section(ui: &mut egui::Ui, title: &str, color: Color32) {
    ui.add_space(5.0);
    ui.separator();
    ui.add_space(5.0);
    ui.label(RichText::new(title).size(16.0).color(color));
}

fn stats_ui(ui: &mut egui::Ui, stats: &FrameStats, adapter_name: &str, sphere_count: usize) {
    ui.heading(
        RichText::new(format!("{} spp", stats.frame_number))
            .size(32.0)
            .color(Color32::from_rgb(74, 158, 255)),
    );
    ui.label(
        RichText::new(adapter_name)
            .size(14.0)
            .color(Color32::GRAY),
    );

    let camera = &stats.camera;
    section(ui, "Camera", Color32::from_rgb(100, 200, 100));
    let position = camera.position();
    let view = camera.view();
    ui.monospace(format!(
        "Pos:  ({:.2}, {:.2}, {:.2})",
        position.x, position.y, position.z
    ));
    ui.monospace(format!("View: ({:.2}, {:.2}, {:.2})", view.x, view.y, view.z));
    ui.monospace(format!("FOV: {:.1}° x {:.1}°", camera.fov[0], camera.fov[1]));
    ui.monospace(format!(
        "Aperture: {:.3}  Focus: {:.2}",
        camera.aperture_radius, camera.focal_distance
    ));

    section(ui, "Rendering", Color32::from_rgb(200, 100, 200));
    ui.monospace(format!(
        "Resolution: {}x{}",
        camera.resolution[0], camera.resolution[1]
    ));
    ui.monospace(format!("Spheres: {sphere_count}"));
    ui.monospace(format!(
        "Groups: {} x {} ({} threads)",
        stats.dispatch.groups_x, stats.dispatch.groups_y, stats.dispatch.group_size
    ));
    ui.monospace(format!(
        "Seeds: {:08x} {:08x}",
        stats.seeds.seed_a, stats.seeds.seed_b
    ));
    ui.monospace(format!("Hash:  {:08x}", stats.seeds.frame_hash));
}
