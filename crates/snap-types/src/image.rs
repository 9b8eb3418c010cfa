/// Pixel layout of a [`RasterImage`] buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Pixel buffer is {actual} bytes, expected {expected} for {width}x{height} {format:?}")]
    BufferSize {
        width: u32,
        height: u32,
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },
}

/// In-memory bitmap handed from the capture source to the text extractor.
///
/// The buffer is validated on construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl RasterImage {
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(ImageError::BufferSize {
                width,
                height,
                format,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Image of uniform color, mostly useful as a fixture
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();

        Self {
            width,
            height,
            format: PixelFormat::Rgb8,
            data,
        }
    }

    /// Zero-sized image, the only way to express "no image"
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            format: PixelFormat::Rgba8,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_short_buffer() {
        let result = RasterImage::new(2, 2, PixelFormat::Rgba8, vec![0; 15]);
        assert!(matches!(
            result,
            Err(ImageError::BufferSize {
                expected: 16,
                actual: 15,
                ..
            })
        ));
    }

    #[test]
    fn test_new_accepts_rgb_buffer() {
        let image = RasterImage::new(3, 1, PixelFormat::Rgb8, vec![255; 9]).unwrap();
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 1);
        assert!(!image.is_empty());
    }

    #[test]
    fn test_filled_is_uniform() {
        let image = RasterImage::filled(4, 2, [10, 20, 30]);
        assert_eq!(image.data().len(), 24);
        assert!(image.data().chunks(3).all(|px| px == [10, 20, 30]));
    }

    #[test]
    fn test_empty_image() {
        assert!(RasterImage::empty().is_empty());
        // zero height with a valid (empty) buffer is still empty
        let image = RasterImage::new(10, 0, PixelFormat::Rgb8, vec![]).unwrap();
        assert!(image.is_empty());
    }
}
