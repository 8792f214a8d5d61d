use crate::{
    assets::font::FontSource,
    config::RenderConfig,
    foundation::core::Rgb8,
    foundation::error::{LyricError, LyricResult},
    render::frame::FrameRGBA,
    render::layout::ChunkLayout,
    text::renderer::TextRenderer,
    timeline::chunk::{Chunk, active_chunk},
    timeline::color::{WordState, resolve},
    timeline::word::Word,
};

/// What a frame shows at one instant, without pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameLines {
    /// Presentation time in seconds.
    pub t: f64,
    /// Index of the visible chunk, if any.
    pub chunk: Option<usize>,
    /// Words of the top and bottom line with their display state.
    pub lines: [Vec<(String, WordState)>; 2],
}

/// Describe the frame at `t`: which chunk is visible and the state of each of its words.
pub fn describe_frame(chunks: &[Chunk<'_>], t: f64, grace_secs: f64) -> FrameLines {
    let mut lines: [Vec<(String, WordState)>; 2] = [Vec::new(), Vec::new()];
    let chunk = active_chunk(chunks, t, grace_secs);
    if let Some(c) = chunk {
        for (slot, words) in lines.iter_mut().zip(c.lines()) {
            *slot = words.iter().map(|w| (w.text.clone(), resolve(w, t))).collect();
        }
    }
    FrameLines {
        t,
        chunk: chunk.map(Chunk::index),
        lines,
    }
}

#[derive(Clone, Debug, PartialEq)]
struct LayoutKey {
    line_words: usize,
    words: Vec<Word>,
}

impl LayoutKey {
    fn matches(&self, chunk: &Chunk<'_>) -> bool {
        self.line_words == chunk.line_words() && self.words.as_slice() == chunk.words()
    }

    fn of(chunk: &Chunk<'_>) -> Self {
        Self {
            line_words: chunk.line_words(),
            words: chunk.words().to_vec(),
        }
    }
}

/// Turns a visible chunk and a timestamp into a frame.
///
/// Owns the text shaping state and caches the layout of the most recent chunk: consecutive frames
/// of one chunk differ only in word colors, so glyphs are shaped once per chunk.
pub struct FrameCompositor {
    cfg: RenderConfig,
    text: TextRenderer,
    cached: Option<(LayoutKey, ChunkLayout)>,
}

impl FrameCompositor {
    /// Build a compositor drawing with `font`.
    ///
    /// Outline fonts the shaper rejects degrade to the built-in font with a warning.
    pub fn new(cfg: &RenderConfig, font: &FontSource) -> Self {
        let text = match TextRenderer::new(font, cfg.font.size_px) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "font rejected by shaper; using built-in font");
                TextRenderer::builtin(cfg.font.size_px)
            }
        };
        Self {
            cfg: cfg.clone(),
            text,
            cached: None,
        }
    }

    /// Whether text is drawn with the built-in bitmap font.
    pub fn uses_builtin_font(&self) -> bool {
        self.text.is_builtin()
    }

    /// The configuration frames are rendered with.
    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    /// Render one frame. With no chunk the frame is the plain background.
    ///
    /// Pure in its inputs: the same chunk, `t` and configuration always give identical pixels.
    pub fn render_frame(&mut self, chunk: Option<&Chunk<'_>>, t: f64) -> LyricResult<FrameRGBA> {
        let width: u16 = self
            .cfg
            .canvas
            .width
            .try_into()
            .map_err(|_| LyricError::validation("canvas width exceeds u16"))?;
        let height: u16 = self
            .cfg
            .canvas
            .height
            .try_into()
            .map_err(|_| LyricError::validation("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(LyricError::validation("canvas width/height must be non-zero"));
        }

        let bg = self.cfg.palette.background;
        let mut pixmap = vello_cpu::Pixmap::new(width, height);

        let Some(chunk) = chunk else {
            clear_pixmap(&mut pixmap, bg);
            return Ok(into_frame(pixmap, self.cfg.canvas.width, self.cfg.canvas.height));
        };

        self.ensure_layout(chunk)?;
        let Some((_, layout)) = self.cached.as_ref() else {
            return Err(LyricError::validation("chunk layout missing after build"));
        };

        // render_to_pixmap overwrites every pixel, so the background is part of the scene.
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, 255));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        let words = chunk.words();
        for line in &layout.lines {
            for placed in &line.words {
                let Some(word) = words.get(placed.chunk_word) else {
                    continue;
                };
                let color = self.cfg.palette.color_for(resolve(word, t));
                self.text.fill(&mut ctx, &placed.shaped, placed.origin, color);
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Ok(into_frame(pixmap, self.cfg.canvas.width, self.cfg.canvas.height))
    }

    fn ensure_layout(&mut self, chunk: &Chunk<'_>) -> LyricResult<()> {
        if let Some((key, _)) = &self.cached
            && key.matches(chunk)
        {
            return Ok(());
        }
        let layout = ChunkLayout::build(chunk, &self.cfg, &mut self.text)?;
        tracing::debug!(
            chunk = chunk.index(),
            lines = layout.lines.len(),
            "laid out chunk"
        );
        self.cached = Some((LayoutKey::of(chunk), layout));
        Ok(())
    }
}

/// One-shot frame render: builds a compositor, then renders the chunk at `t`.
///
/// Returns **premultiplied** RGBA8 pixels. Prefer [`FrameCompositor`] for sequences of frames.
pub fn render_frame(
    chunk: Option<&Chunk<'_>>,
    t: f64,
    cfg: &RenderConfig,
    font: &FontSource,
) -> LyricResult<FrameRGBA> {
    FrameCompositor::new(cfg, font).render_frame(chunk, t)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, color: Rgb8) {
    let rgba = color.to_rgba8();
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn into_frame(pixmap: vello_cpu::Pixmap, width: u32, height: u32) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
