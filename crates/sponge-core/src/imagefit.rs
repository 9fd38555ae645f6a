//! # Crop/Fit Geometry
//!
//! The arithmetic behind the image handler's `crop/<W>x<H>/` URLs, kept
//! separate from pixel work so it stays pure and testable.
//!
//! The rules are ported from the handler's original crop-to-fit routine
//! (itself derived from Kevin Cazabon's public fit algorithm):
//!
//! - the live area of a source is `(w-1) x (h-1)`
//! - whichever source axis overshoots the target aspect ratio is cropped,
//!   the dependent dimension rounding half-up
//! - the crop window is centered, offsets truncating downward
//!
//! All of it is integer arithmetic: aspect ratios are compared by
//! cross-multiplying and the half-up rounding of `a / b` is computed as
//! `(2a + b) / 2b`.

// =============================================================================
// CROP BOX
// =============================================================================

/// A crop window in source-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Window width.
    pub width: u32,
    /// Window height.
    pub height: u32,
}

// =============================================================================
// FIT
// =============================================================================

/// The centered crop of a `src_w x src_h` source that matches the aspect
/// ratio of `out_w x out_h`.
///
/// Degenerate inputs (a source smaller than 2x2, or a zero target
/// dimension) return the full-image box unchanged.
#[must_use]
pub fn fit_box(src_w: u32, src_h: u32, out_w: u32, out_h: u32) -> CropBox {
    if src_w < 2 || src_h < 2 || out_w == 0 || out_h == 0 {
        return CropBox {
            x: 0,
            y: 0,
            width: src_w,
            height: src_h,
        };
    }

    let live_w = u64::from(src_w - 1);
    let live_h = u64::from(src_h - 1);
    let target_w = u64::from(out_w);
    let target_h = u64::from(out_h);

    // live_w / live_h >= target_w / target_h, cross-multiplied.
    let live_is_wider =
        u128::from(live_w) * u128::from(target_h) >= u128::from(target_w) * u128::from(live_h);

    let (crop_w, crop_h) = if live_is_wider {
        // Wider than the target wants: crop the sides.
        (round_half_up(target_w * live_h, target_h), live_h)
    } else {
        // Taller than the target wants: crop top and bottom.
        (live_w, round_half_up(target_h * live_w, target_w))
    };
    // Extreme aspect targets can round the dependent dimension to zero;
    // a crop window is never thinner than one pixel.
    let crop_w = crop_w.max(1);
    let crop_h = crop_h.max(1);

    let x = live_w.saturating_sub(crop_w) / 2;
    let y = live_h.saturating_sub(crop_h) / 2;

    CropBox {
        x: x as u32,
        y: y as u32,
        width: crop_w as u32,
        height: crop_h as u32,
    }
}

/// Offsets that center an `img_w x img_h` image on a canvas.
///
/// Floor division, so offsets go negative (and stay centered) when the
/// image is larger than the canvas.
#[must_use]
pub fn center_offsets(canvas_w: u32, canvas_h: u32, img_w: u32, img_h: u32) -> (i64, i64) {
    let left = (i64::from(canvas_w) - i64::from(img_w)).div_euclid(2);
    let top = (i64::from(canvas_h) - i64::from(img_h)).div_euclid(2);
    (left, top)
}

fn round_half_up(numerator: u64, denominator: u64) -> u64 {
    let n = u128::from(numerator);
    let d = u128::from(denominator);
    ((2 * n + d) / (2 * d)) as u64
}

// =============================================================================
// TESTS
// =============================================================================
