/// An RGBA pixel buffer representing a rendered image.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order, top row first.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a new buffer filled with black (opaque).
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// The RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = y as usize * self.stride() + x as usize * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_opaque_black() {
        let buf = RenderBuffer::new(10, 10);
        assert_eq!(buf.pixels.len(), 400);
        for chunk in buf.pixels.chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn pixel_addresses_row_major() {
        let mut buf = RenderBuffer::new(3, 2);
        let i = buf.stride() + 2 * 4;
        buf.pixels[i..i + 4].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(buf.pixel(2, 1), [1, 2, 3, 4]);
        assert_eq!(buf.pixel(0, 0), [0, 0, 0, 255]);
    }
}
