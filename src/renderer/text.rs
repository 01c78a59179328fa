use crate::config::is_dark;
use crate::frame::Frame;
use crate::renderer::{panel_rect, Palette};
use crate::scene::Scene;
use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, PrepareError, RenderError,
    Resolution, Shaping, SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};

/// Logical font sizes.
const TITLE_SIZE: f32 = 30.0;
const LABEL_SIZE: f32 = 13.0;
const HINT_SIZE: f32 = 13.0;
/// Logical inset of titles inside their panel, and of the hint from the left edge.
const TITLE_INSET: f32 = 28.0;
const HINT_INSET: f32 = 28.0;
/// The hint never draws at full strength.
const HINT_ALPHA: f32 = 0.6;

/// A shaped single line and the text it was shaped from.
struct LineBuffer {
    text: String,
    buffer: Buffer,
    width: f32,
    line_height: f32,
}

impl LineBuffer {
    fn shape(font_system: &mut FontSystem, text: &str, font_size: f32) -> Self {
        let line_height = (font_size * 1.25).ceil();
        let mut buffer = Buffer::new(font_system, Metrics::new(font_size, line_height));
        buffer.set_size(font_system, None, Some(line_height));
        buffer.set_text(font_system, text, &Attrs::new().family(Family::SansSerif), Shaping::Advanced);
        buffer.shape_until_scroll(font_system, false);
        let width = buffer.layout_runs().map(|run| run.line_w).fold(0.0f32, f32::max);
        Self { text: text.to_string(), buffer, width, line_height }
    }

    /// Reshape only when the text or the size changed.
    fn refresh(slot: &mut Option<LineBuffer>, font_system: &mut FontSystem, text: &str, font_size: f32) {
        let stale = slot
            .as_ref()
            .map_or(true, |b| b.text != text || b.buffer.metrics().font_size != font_size);
        if stale {
            *slot = Some(Self::shape(font_system, text, font_size));
        }
    }
}

/// Section titles, the hovered-section label and the scroll hint.
pub struct TextLayer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    atlas: TextAtlas,
    viewport: Viewport,
    renderer: TextRenderer,
    /// One title per section, in section order.
    titles: Vec<Option<LineBuffer>>,
    label: Option<LineBuffer>,
    hint: Option<LineBuffer>,
}

impl TextLayer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer = TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            atlas,
            viewport,
            renderer,
            titles: Vec::new(),
            label: None,
            hint: None,
        }
    }

    /// Forget shaped text, e.g. after a scale factor change.
    pub fn invalidate(&mut self) {
        self.titles.clear();
        self.label = None;
        self.hint = None;
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
        frame: &Frame,
        palette: &Palette,
        surface: (u32, u32),
        scale: f32,
    ) -> Result<(), PrepareError> {
        let sections = scene.track().sections();
        let nav_label = scene.nav().label();
        let hint_opacity = scene.hint().opacity();
        let (surface_w, surface_h) = (surface.0 as f32, surface.1 as f32);

        self.titles.resize_with(sections.len(), || None);
        for (slot, section) in self.titles.iter_mut().zip(sections) {
            LineBuffer::refresh(slot, &mut self.font_system, &section.label(), TITLE_SIZE * scale);
        }
        if !nav_label.text.is_empty() {
            LineBuffer::refresh(&mut self.label, &mut self.font_system, &nav_label.text, LABEL_SIZE * scale);
        }
        LineBuffer::refresh(&mut self.hint, &mut self.font_system, scene.hint().text(), HINT_SIZE * scale);

        let full = TextBounds { left: 0, top: 0, right: surface.0 as i32, bottom: surface.1 as i32 };
        let mut areas: Vec<TextArea> = Vec::with_capacity(sections.len() + 2);

        for (title, section) in self.titles.iter().zip(sections) {
            let (Some(title), Some(panel)) = (title, panel_rect(section, frame.translate_x, (surface_w, surface_h)))
            else {
                continue;
            };
            let inset = TITLE_INSET * scale;
            let color = if is_dark(section.color) { palette.foreground } else { palette.background };
            areas.push(TextArea {
                buffer: &title.buffer,
                left: panel.x + inset,
                top: panel.y + inset,
                scale: 1.0,
                bounds: TextBounds {
                    left: panel.x.max(0.0) as i32,
                    top: panel.y as i32,
                    right: (panel.x + panel.width).min(surface_w) as i32,
                    bottom: (panel.y + panel.height) as i32,
                },
                default_color: to_glyphon_color(color),
                custom_glyphs: &[],
            });
        }

        if let Some(label) = self.label.as_ref().filter(|_| nav_label.opacity > 0.0) {
            let (cx, bottom) = scene.nav_layout().label_anchor();
            areas.push(TextArea {
                buffer: &label.buffer,
                left: cx - label.width / 2.0,
                top: bottom - label.line_height + nav_label.offset_y * scale,
                scale: 1.0,
                bounds: full,
                default_color: to_glyphon_color(with_alpha(palette.label, nav_label.opacity)),
                custom_glyphs: &[],
            });
        }

        if let Some(hint) = self.hint.as_ref().filter(|_| hint_opacity > 0.0) {
            areas.push(TextArea {
                buffer: &hint.buffer,
                left: HINT_INSET * scale,
                top: scene.nav_layout().baseline - hint.line_height,
                scale: 1.0,
                bounds: full,
                default_color: to_glyphon_color(with_alpha(palette.foreground, hint_opacity * HINT_ALPHA)),
                custom_glyphs: &[],
            });
        }

        self.viewport.update(queue, Resolution { width: surface.0, height: surface.1 });
        self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            areas,
            &mut self.swash_cache,
        )
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) -> Result<(), RenderError> {
        self.renderer.render(&self.atlas, &self.viewport, pass)
    }

    /// Release glyphs that were not used this frame.
    pub fn end_frame(&mut self) {
        self.atlas.trim();
    }
}

fn with_alpha(c: [f32; 4], opacity: f32) -> [f32; 4] {
    [c[0], c[1], c[2], c[3] * opacity]
}

pub fn to_glyphon_color(c: [f32; 4]) -> Color {
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
    Color::rgba(byte(c[0]), byte(c[1]), byte(c[2]), byte(c[3]))
}
