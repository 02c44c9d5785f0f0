use crate::{
    coordinator::FALLBACK_SCREEN,
    platform::{ScreenBounds, WindowGeometry},
};

fn centered_offset(available: u32, size: u32) -> i32 {
    let available = i64::from(available);
    let size = i64::from(size);
    let max = (available - size).max(0);
    let offset = ((available - size) / 2).clamp(0, max);
    i32::try_from(offset).unwrap_or(i32::MAX)
}

/// Center a `width` x `height` window on `screen`, never off the top-left edge.
///
/// Without screen metrics a 1920x1080 screen is assumed.
pub fn centered_geometry(screen: Option<ScreenBounds>, width: u32, height: u32) -> WindowGeometry {
    let screen = screen.unwrap_or(FALLBACK_SCREEN);

    WindowGeometry {
        left: centered_offset(screen.width, width),
        top: centered_offset(screen.height, height),
        width,
        height,
    }
}
