use super::*;

#[test]
fn flatten_opaque_drops_alpha() {
    let src = vec![1u8, 2, 3, 255, 200, 100, 50, 255];
    let mut dst = vec![0u8; 6];
    flatten_premul_to_rgb24(&mut dst, &src, [9, 9, 9]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 200, 100, 50]);
}

#[test]
fn flatten_transparent_returns_background() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 3];
    flatten_premul_to_rgb24(&mut dst, &src, [10, 20, 30]).unwrap();
    assert_eq!(dst, vec![10, 20, 30]);
}

#[test]
fn flatten_half_alpha_over_black() {
    // Premultiplied red @ 50% alpha => rgb is 128,0,0 over black.
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 3];
    flatten_premul_to_rgb24(&mut dst, &src, [0, 0, 0]).unwrap();
    assert_eq!(dst, vec![128, 0, 0]);
}

#[test]
fn flatten_rejects_mismatched_lengths() {
    let src = vec![0u8; 8];
    let mut dst = vec![0u8; 5];
    assert!(flatten_premul_to_rgb24(&mut dst, &src, [0, 0, 0]).is_err());
}
