use image::RgbaImage;

/// Pack RGBA bytes as `alpha << 24 | blue << 16 | green << 8 | red`.
pub fn pack(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}

pub fn unpack(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Packed view of a raster, one `u32` per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = image
            .as_raw()
            .chunks_exact(4)
            .map(|px| pack([px[0], px[1], px[2], px[3]]))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: u32) {
        let index = self.index(x, y);
        self.pixels[index] = value;
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        let raw: Vec<u8> = self.pixels.into_iter().flat_map(unpack).collect();
        // The buffer always holds width * height packed pixels.
        RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}
