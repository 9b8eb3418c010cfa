use anyhow::{Context, Result, bail};
use snap_types::{CaptureRegion, PixelFormat, RasterImage};
use xcap::Monitor;

/// Source of the image a pipeline run works on
pub trait CaptureSource: Send + Sync {
    /// `Ok(None)` when the user cancelled the selection
    fn capture_region(&self) -> Result<Option<RasterImage>>;
}

/// Grabs a fixed screen region, or the primary monitor when none is set
pub struct ScreenCapture {
    region: Option<CaptureRegion>,
}

impl ScreenCapture {
    pub fn new(region: Option<CaptureRegion>) -> Self {
        Self { region }
    }
}

impl CaptureSource for ScreenCapture {
    fn capture_region(&self) -> Result<Option<RasterImage>> {
        match self.region {
            Some(region) if region.is_degenerate() => {
                tracing::debug!("Empty selection {:?}, capture cancelled", region);
                Ok(None)
            }
            Some(region) => capture_screen_region(region).map(Some),
            None => capture_primary_screen().map(Some),
        }
    }
}

/// Capture the entire primary monitor as RGBA
pub fn capture_primary_screen() -> Result<RasterImage> {
    let monitors = Monitor::all().context("Failed to get monitors")?;
    let monitor = monitors.first().context("No monitor found")?;

    let image = monitor.capture_image().context("Failed to capture screen")?;
    to_raster(image)
}

/// Capture a region of the screen
pub fn capture_screen_region(region: CaptureRegion) -> Result<RasterImage> {
    let monitors = Monitor::all().context("Failed to get monitors")?;

    let monitor = monitors
        .iter()
        .find(|m| monitor_contains((m.x(), m.y()), (m.width(), m.height()), &region))
        .context(format!("No monitor contains region {:?}", region))?;

    let image = monitor.capture_image().context("Failed to capture screen")?;

    let cropped = xcap::image::imageops::crop_imm(
        &image,
        (region.x - monitor.x()) as u32,
        (region.y - monitor.y()) as u32,
        region.width,
        region.height,
    )
    .to_image();

    to_raster(cropped)
}

/// Bounds are compared in i64 so oversized configured regions cannot overflow
fn monitor_contains(origin: (i32, i32), size: (u32, u32), region: &CaptureRegion) -> bool {
    let (mx, my) = (i64::from(origin.0), i64::from(origin.1));
    let (rx, ry) = (i64::from(region.x), i64::from(region.y));

    rx >= mx
        && ry >= my
        && rx + i64::from(region.width) <= mx + i64::from(size.0)
        && ry + i64::from(region.height) <= my + i64::from(size.1)
}

fn to_raster(image: xcap::image::RgbaImage) -> Result<RasterImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        bail!("Captured an empty image");
    }

    Ok(RasterImage::new(
        width,
        height,
        PixelFormat::Rgba8,
        image.into_raw(),
    )?)
}
