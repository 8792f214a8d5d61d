use std::borrow::Cow;

use crate::{
    assets::font::FontSource,
    foundation::core::Rgb8,
    foundation::error::{LyricError, LyricResult},
    text::builtin,
};

/// Parley brush. Word colors are applied at fill time, so the brush carries nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PlainBrush;

#[derive(Clone, Copy, Debug, PartialEq)]
struct PlacedGlyph {
    id: u32,
    x: f32,
    y: f32,
}

#[derive(Clone, Debug, PartialEq)]
enum ShapedGlyphs {
    Outline {
        font_size: f32,
        glyphs: Vec<PlacedGlyph>,
    },
    Cells(Vec<kurbo::Rect>),
}

/// Shaped text relative to its top-left origin, plus its advance width.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedText {
    width: f32,
    glyphs: ShapedGlyphs,
}

impl ShapedText {
    /// Horizontal advance, trailing whitespace included.
    pub fn width(&self) -> f32 {
        self.width
    }
}

struct OutlineFace {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<PlainBrush>,
    family: String,
    font: vello_cpu::peniko::FontData,
}

enum Face {
    Outline(Box<OutlineFace>),
    Builtin { cell_px: u32, top_pad_px: f32 },
}

/// Measures and draws text in one font at one size.
///
/// Holds mutable shaping contexts, so each render worker owns its own instance.
pub struct TextRenderer {
    size_px: f32,
    face: Face,
}

impl TextRenderer {
    /// Build a renderer for `source` at `size_px`.
    ///
    /// Fails only when outline font bytes cannot be registered with the shaper; callers fall
    /// back to [`TextRenderer::builtin`].
    pub fn new(source: &FontSource, size_px: f32) -> LyricResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LyricError::validation("text size_px must be finite and > 0"));
        }

        match source {
            FontSource::Builtin => Ok(Self::builtin(size_px)),
            FontSource::Outline { bytes, index, .. } => {
                // Shaper and rasterizer share one blob over the font bytes.
                let blob = vello_cpu::peniko::Blob::<u8>::new(bytes.clone());
                let mut font_ctx = parley::FontContext::default();
                let families = font_ctx.collection.register_fonts(blob.clone(), None);
                let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                    LyricError::validation("no font families registered from font bytes")
                })?;
                let family = font_ctx
                    .collection
                    .family_name(family_id)
                    .ok_or_else(|| LyricError::validation("registered font family has no name"))?
                    .to_string();

                let font = vello_cpu::peniko::FontData::new(blob, *index);

                Ok(Self {
                    size_px,
                    face: Face::Outline(Box::new(OutlineFace {
                        font_ctx,
                        layout_ctx: parley::LayoutContext::new(),
                        family,
                        font,
                    })),
                })
            }
        }
    }

    /// Renderer for the built-in bitmap font. Never fails.
    pub fn builtin(size_px: f32) -> Self {
        let size_px = if size_px.is_finite() && size_px > 0.0 {
            size_px
        } else {
            1.0
        };
        let cell_px = builtin::cell_px(size_px);
        let glyph_h = (cell_px * builtin::GLYPH_ROWS) as f32;
        Self {
            size_px,
            face: Face::Builtin {
                cell_px,
                top_pad_px: ((size_px - glyph_h) / 2.0).max(0.0).round(),
            },
        }
    }

    /// Return `true` when drawing with the built-in bitmap font.
    pub fn is_builtin(&self) -> bool {
        matches!(self.face, Face::Builtin { .. })
    }

    /// Nominal font size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Shape `text` on a single unbroken line.
    pub fn shape(&mut self, text: &str) -> LyricResult<ShapedText> {
        match &mut self.face {
            Face::Builtin {
                cell_px,
                top_pad_px,
            } => Ok(shape_builtin(text, *cell_px, *top_pad_px)),
            Face::Outline(face) => face.shape(text, self.size_px),
        }
    }

    /// Advance width of `text`, trailing whitespace included.
    pub fn measure(&mut self, text: &str) -> LyricResult<f32> {
        Ok(self.shape(text)?.width)
    }

    /// Fill `shaped` with its top-left corner at `origin`.
    pub fn fill(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        shaped: &ShapedText,
        origin: kurbo::Point,
        color: Rgb8,
    ) {
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, 255,
        ));

        match (&self.face, &shaped.glyphs) {
            (Face::Outline(face), ShapedGlyphs::Outline { font_size, glyphs }) => {
                ctx.glyph_run(&face.font)
                    .font_size(*font_size)
                    .fill_glyphs(glyphs.iter().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    }));
            }
            (_, ShapedGlyphs::Cells(cells)) => {
                for cell in cells {
                    ctx.fill_rect(&rect_to_cpu(*cell));
                }
            }
            (Face::Builtin { .. }, ShapedGlyphs::Outline { .. }) => {
                tracing::warn!("outline glyphs cannot be filled with the built-in font; skipped");
            }
        }

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

impl OutlineFace {
    fn shape(&mut self, text: &str, size_px: f32) -> LyricResult<ShapedText> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(PlainBrush));

        let mut layout: parley::Layout<PlainBrush> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut font_size = size_px;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                font_size = run.run().font_size();
                glyphs.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Ok(ShapedText {
            width: layout.full_width(),
            glyphs: ShapedGlyphs::Outline { font_size, glyphs },
        })
    }
}

fn shape_builtin(text: &str, cell_px: u32, top_pad_px: f32) -> ShapedText {
    let cell = f64::from(cell_px);
    let advance = f64::from(cell_px * builtin::ADVANCE_COLS);
    let top = f64::from(top_pad_px);

    let mut cells = Vec::new();
    let mut pen_x = 0.0f64;
    for c in text.chars() {
        for (col, row) in builtin::lit_cells(c) {
            let x0 = pen_x + f64::from(col) * cell;
            let y0 = top + f64::from(row) * cell;
            cells.push(kurbo::Rect::new(x0, y0, x0 + cell, y0 + cell));
        }
        pen_x += advance;
    }

    ShapedText {
        width: pen_x as f32,
        glyphs: ShapedGlyphs::Cells(cells),
    }
}

fn rect_to_cpu(r: kurbo::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/text/renderer.rs"]
mod tests;
