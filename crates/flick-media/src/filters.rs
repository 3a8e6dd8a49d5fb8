//! FFmpeg filter chain construction.

/// Scale to a fixed output height, preserving aspect ratio.
///
/// Width is computed from the output height and input aspect, rounded down
/// to an even value; SAR is normalized to square pixels.
pub fn variant_scale(height: u32) -> String {
    format!("scale=trunc(oh*a/2)*2:{height},setsar=1")
}

/// Scale to fit within a `width`x`height` box, preserving aspect ratio, then
/// pad (centered) to exactly fill it.
pub fn box_fit(width: u32, height: u32) -> String {
    format!(
        "scale=w={w}:h={h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2",
        w = width,
        h = height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_scale() {
        assert_eq!(variant_scale(720), "scale=trunc(oh*a/2)*2:720,setsar=1");
    }

    #[test]
    fn test_box_fit() {
        assert_eq!(
            box_fit(640, 360),
            "scale=w=640:h=360:force_original_aspect_ratio=decrease,pad=640:360:(ow-iw)/2:(oh-ih)/2"
        );
    }
}
