use crate::foundation::error::{LyricError, LyricResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Flatten premultiplied RGBA8 over an opaque background into packed RGB24.
pub(crate) fn flatten_premul_to_rgb24(
    dst: &mut [u8],
    src_premul: &[u8],
    bg: [u8; 3],
) -> LyricResult<()> {
    if !src_premul.len().is_multiple_of(4) || dst.len() != src_premul.len() / 4 * 3 {
        return Err(LyricError::validation(
            "flatten_premul_to_rgb24 expects rgba8 input and a matching rgb24 output",
        ));
    }

    let bg = bg.map(u16::from);
    for (d, s) in dst.chunks_exact_mut(3).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(&s[..3]);
            continue;
        }

        let inv = 255 - a;
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
