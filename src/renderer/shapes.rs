use crate::frame::Frame;
use crate::nav::layout::Rect;
use crate::renderer::{panel_rect, Palette};
use crate::scene::Scene;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// One flat rectangle: a section panel or a nav line.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    pub rect: [f32; 4],
    pub color: [f32; 4],
}

impl ShapeInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x4,
        1 => Float32x4,
    ];

    pub fn new(rect: Rect, color: [f32; 4]) -> Self {
        Self { rect: [rect.x, rect.y, rect.width, rect.height], color }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A panel and a nav line per section.
pub fn capacity_for(section_count: usize) -> usize {
    (section_count * 2).max(1)
}

/// Everything flat-coloured in this frame, panels first so the nav lines
/// draw on top. Panels entirely off the surface are skipped.
pub fn collect_shapes(
    scene: &Scene,
    frame: &Frame,
    palette: &Palette,
    surface: (f32, f32),
    out: &mut Vec<ShapeInstance>,
) {
    out.clear();
    for section in scene.track().sections() {
        if let Some(rect) = panel_rect(section, frame.translate_x, surface) {
            out.push(ShapeInstance::new(rect, section.color));
        }
    }
    let layout = scene.nav_layout();
    for (index, line) in scene.nav().lines().iter().enumerate() {
        if let Some(rect) = layout.line_rect(index, line.height) {
            let mut color = palette.nav_line;
            color[3] *= line.opacity;
            out.push(ShapeInstance::new(rect, color));
        }
    }
}

/// Instanced pipeline for the track panels and nav lines. Instances are in
/// pixels; the shader maps them to clip space from the surface size uniform.
pub struct ShapeLayer {
    pipeline: wgpu::RenderPipeline,
    surface_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    capacity: usize,
    instances: Vec<ShapeInstance>,
    drawn: u32,
}

impl ShapeLayer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, section_count: usize) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shapes_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../assets/shaders/shapes.wgsl").into()),
        });

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shapes_surface_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let surface_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shapes_surface"),
            contents: bytemuck::cast_slice(&[1.0f32, 1.0, 0.0, 0.0]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shapes_surface_group"),
            layout: &bind_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: surface_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shapes_layout"),
            bind_group_layouts: &[&bind_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shapes_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[ShapeInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let capacity = capacity_for(section_count);
        Self {
            pipeline,
            surface_buffer,
            bind_group,
            instance_buffer: Self::instance_buffer(device, capacity),
            capacity,
            instances: Vec::with_capacity(capacity),
            drawn: 0,
        }
    }

    fn instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shapes_instances"),
            size: (capacity * std::mem::size_of::<ShapeInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Collect this frame's shapes and upload them, growing the instance
    /// buffer when the scene outgrows it.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
        frame: &Frame,
        palette: &Palette,
        surface: (f32, f32),
    ) {
        collect_shapes(scene, frame, palette, surface, &mut self.instances);
        if self.instances.len() > self.capacity {
            self.capacity = self.instances.len().next_power_of_two();
            log::debug!("shape buffer grown to {} instances", self.capacity);
            self.instance_buffer = Self::instance_buffer(device, self.capacity);
        }
        queue.write_buffer(&self.surface_buffer, 0, bytemuck::cast_slice(&[surface.0, surface.1, 0.0, 0.0]));
        if !self.instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
        }
        self.drawn = self.instances.len() as u32;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.drawn == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..4, 0..self.drawn);
    }
}
