use crate::config::{parse_hex_color, SectionConfig, TrackConfig};

const FALLBACK_SECTION_COLOR: [f32; 4] = [0.11, 0.106, 0.122, 1.0];

/// One panel of the horizontal track, in track coordinates (physical pixels).
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub index: usize,
    pub offset_left: f32,
    pub width: f32,
    pub display_name: String,
    pub color: [f32; 4],
}

impl Section {
    pub fn center(&self) -> f32 {
        self.offset_left + self.width / 2.0
    }

    /// Name shown in the nav label; unnamed sections are numbered from 1.
    pub fn label(&self) -> String {
        if self.display_name.trim().is_empty() {
            format!("Section {}", self.index + 1)
        } else {
            self.display_name.clone()
        }
    }
}

/// The scrollable track. The section set is fixed at construction; only the
/// geometry is recomputed when the viewport changes size.
pub struct Track {
    entries: Vec<SectionConfig>,
    layout: TrackConfig,
    sections: Vec<Section>,
    width: f32,
}

impl Track {
    pub fn new(entries: &[SectionConfig], layout: &TrackConfig, viewport_width: f32) -> Self {
        let mut track = Self {
            entries: entries.to_vec(),
            layout: layout.clone(),
            sections: Vec::with_capacity(entries.len()),
            width: 0.0,
        };
        track.relayout(viewport_width);
        track
    }

    /// Lay sections out left to right. Widths, gap and padding are fractions
    /// of the viewport width.
    pub fn relayout(&mut self, viewport_width: f32) {
        let vw = viewport_width.max(0.0);
        let padding = self.layout.padding.max(0.0) * vw;
        let gap = self.layout.gap.max(0.0) * vw;

        self.sections.clear();
        let mut x = padding;
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                x += gap;
            }
            let width = entry.width.max(0.0) * vw;
            self.sections.push(Section {
                index,
                offset_left: x,
                width,
                display_name: entry.name.clone(),
                color: parse_hex_color(&entry.color).unwrap_or(FALLBACK_SECTION_COLOR),
            });
            x += width;
        }
        self.width = x + padding;
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Total content width, the equivalent of `scrollWidth`.
    pub fn width(&self) -> f32 {
        self.width
    }
}
