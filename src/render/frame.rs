use crate::{
    foundation::core::Rgb8,
    foundation::error::LyricResult,
    foundation::math::flatten_premul_to_rgb24,
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames come out of the compositor **premultiplied**; the `premultiplied` flag keeps that
/// explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA bytes of the pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Return `true` when every pixel equals `color`, fully opaque.
    pub fn is_solid(&self, color: Rgb8) -> bool {
        let want = color.to_rgba8();
        self.data.chunks_exact(4).all(|px| px == want)
    }

    /// Count pixels whose RGB is within `tolerance` of `color` on every channel.
    pub fn count_near(&self, color: Rgb8, tolerance: u8) -> usize {
        let near = |a: u8, b: u8| a.abs_diff(b) <= tolerance;
        self.data
            .chunks_exact(4)
            .filter(|px| near(px[0], color.r) && near(px[1], color.g) && near(px[2], color.b))
            .count()
    }

    /// Pack into RGB24, flattening any transparency over `background`.
    pub fn to_rgb24(&self, background: Rgb8) -> LyricResult<Vec<u8>> {
        let mut out = vec![0u8; self.data.len() / 4 * 3];
        flatten_premul_to_rgb24(&mut out, &self.data, [background.r, background.g, background.b])?;
        Ok(out)
    }
}
