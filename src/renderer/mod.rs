pub mod shapes;
pub mod text;

use crate::config::{parse_hex_color, ColorsConfig, Config};
use crate::frame::Frame;
use crate::nav::layout::Rect;
use crate::renderer::shapes::ShapeLayer;
use crate::renderer::text::TextLayer;
use crate::scene::Scene;
use crate::track::Section;
use anyhow::{Context, Result};
use std::sync::Arc;
use wgpu::SurfaceError;
use winit::window::Window;

/// Panel band as fractions of the surface height.
const PANEL_TOP: f32 = 0.14;
const PANEL_HEIGHT: f32 = 0.62;

/// Resolved colours. Unparseable entries fall back to the built-in palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: [f32; 4],
    pub foreground: [f32; 4],
    pub nav_line: [f32; 4],
    pub label: [f32; 4],
}

impl Palette {
    pub fn from_colors(colors: &ColorsConfig) -> Self {
        let builtin = Self::default();
        let resolve = |hex: &str, fallback: [f32; 4]| {
            parse_hex_color(hex).unwrap_or_else(|| {
                log::warn!("invalid colour {:?}, using default", hex);
                fallback
            })
        };
        Self {
            background: resolve(&colors.background, builtin.background),
            foreground: resolve(&colors.foreground, builtin.foreground),
            nav_line: resolve(&colors.nav_line, builtin.nav_line),
            label: resolve(&colors.label, builtin.label),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let ink = [0.95, 0.94, 0.92, 1.0];
        Self { background: [0.043, 0.043, 0.047, 1.0], foreground: ink, nav_line: ink, label: ink }
    }
}

/// On-surface rect of a section panel with the track translated by
/// `translate_x`, or `None` when the panel is entirely off the surface.
pub fn panel_rect(section: &Section, translate_x: f32, surface: (f32, f32)) -> Option<Rect> {
    let x = section.offset_left + translate_x;
    if x + section.width <= 0.0 || x >= surface.0 {
        return None;
    }
    Some(Rect::new(x, surface.1 * PANEL_TOP, section.width, surface.1 * PANEL_HEIGHT))
}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    shapes: ShapeLayer,
    text: TextLayer,
    palette: Palette,
    scale_factor: f32,
}

impl Renderer {
    pub fn new(window: Arc<Window>, app_config: &Config) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("request adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            },
        ))
        .context("request device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shapes = ShapeLayer::new(&device, format, app_config.sections.len());
        let text = TextLayer::new(&device, &queue, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            shapes,
            text,
            palette: Palette::from_colors(&app_config.colors),
            scale_factor: window.scale_factor() as f32,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Take over reloaded colours or a new scale factor.
    pub fn apply_config(&mut self, app_config: &Config, scale_factor: f32) {
        self.palette = Palette::from_colors(&app_config.colors);
        if scale_factor != self.scale_factor {
            self.scale_factor = scale_factor;
            self.text.invalidate();
        }
    }

    pub fn render(&mut self, scene: &Scene, frame: &Frame) -> Result<(), SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let size = (self.config.width, self.config.height);
        let surface = (size.0 as f32, size.1 as f32);

        self.shapes
            .prepare(&self.device, &self.queue, scene, frame, &self.palette, surface);
        let text_ready = match self.text.prepare(
            &self.device,
            &self.queue,
            scene,
            frame,
            &self.palette,
            size,
            self.scale_factor,
        ) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("text prepare failed: {}", e);
                false
            }
        };

        let bg = self.palette.background;
        let mut encoder =
            self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("track_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg[0] as f64,
                            g: bg[1] as f64,
                            b: bg[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.shapes.draw(&mut pass);
            if text_ready {
                if let Err(e) = self.text.render(&mut pass) {
                    log::warn!("text render failed: {}", e);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.text.end_frame();
        Ok(())
    }
}
