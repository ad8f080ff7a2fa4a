//! Pointer/lightgun coordinate translation
//!
//! Pure math: raw pixel coordinates against a reported viewport become two
//! coordinate pairs in the signed 16-bit symmetric range, one relative to
//! the visible area and one relative to the full output surface.

/// Sentinel for a coordinate that scaled outside the representable range.
pub const COORD_OOB: i16 = -0x8000;

const COORD_MAX: i64 = 0x7fff;

/// Viewport geometry reported by the video side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub full_width: u32,
    pub full_height: u32,
}

/// Scaled pointer coordinates: `x`/`y` relative to the visible area,
/// `screen_x`/`screen_y` relative to the full output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatedPointer {
    pub x: i16,
    pub y: i16,
    pub screen_x: i16,
    pub screen_y: i16,
}

fn scale(coord: i64, full_dim: i64) -> i16 {
    let scaled = (2 * coord * COORD_MAX) / full_dim - COORD_MAX;
    if !(-COORD_MAX..=COORD_MAX).contains(&scaled) {
        COORD_OOB
    } else {
        scaled as i16
    }
}

/// Translate a raw pointer coordinate against `vp`.
///
/// Returns `None` when either full viewport dimension is non-positive (the
/// video side has nothing to report yet). Coordinates that scale outside
/// the signed range clamp to [`COORD_OOB`] instead of wrapping.
pub fn translate_coords(vp: &Viewport, pointer_x: i32, pointer_y: i32) -> Option<TranslatedPointer> {
    let full_width = i64::from(vp.full_width);
    let full_height = i64::from(vp.full_height);
    if full_width <= 0 || full_height <= 0 {
        return None;
    }

    let screen_x = scale(i64::from(pointer_x), full_width);
    let screen_y = scale(i64::from(pointer_y), full_height);

    let x = scale(i64::from(pointer_x) - i64::from(vp.x), full_width);
    let y = scale(i64::from(pointer_y) - i64::from(vp.y), full_height);

    Some(TranslatedPointer {
        x,
        y,
        screen_x,
        screen_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp_256x224() -> Viewport {
        Viewport {
            x: 0,
            y: 0,
            width: 256,
            height: 224,
            full_width: 256,
            full_height: 224,
        }
    }

    #[test]
    fn center_maps_near_origin() {
        let res = translate_coords(&vp_256x224(), 128, 112).unwrap();
        assert!(res.x.abs() <= 1, "x = {}", res.x);
        assert!(res.y.abs() <= 1, "y = {}", res.y);
        assert!(res.screen_x.abs() <= 1);
        assert!(res.screen_y.abs() <= 1);
    }

    #[test]
    fn top_left_maps_to_negative_extreme() {
        let res = translate_coords(&vp_256x224(), 0, 0).unwrap();
        assert_eq!((res.x, res.y), (-0x7fff, -0x7fff));
        assert_eq!((res.screen_x, res.screen_y), (-0x7fff, -0x7fff));
    }

    #[test]
    fn degenerate_viewport_fails() {
        let mut vp = vp_256x224();
        vp.full_width = 0;
        assert_eq!(translate_coords(&vp, 10, 10), None);
    }

    #[test]
    fn out_of_bounds_clamps_to_sentinel() {
        // Pointer far past the surface: scaled value exceeds the range.
        let res = translate_coords(&vp_256x224(), 10_000, 112).unwrap();
        assert_eq!(res.x, COORD_OOB);
        assert_eq!(res.screen_x, COORD_OOB);
        // A coordinate left of the offset viewport goes negative OOB too.
        let mut vp = vp_256x224();
        vp.x = 300;
        let res = translate_coords(&vp, 0, 112).unwrap();
        assert_eq!(res.x, COORD_OOB);
    }

    #[test]
    fn offset_viewport_shifts_visible_coords_only() {
        let mut vp = vp_256x224();
        vp.x = 64;
        let res = translate_coords(&vp, 64, 0).unwrap();
        assert_eq!(res.x, -0x7fff);
        assert_ne!(res.screen_x, -0x7fff);
    }
}
