//! CPU-side RGBA8 framebuffer at display resolution
//!
//! The scene is drawn here pixel by pixel and uploaded to the GPU once per
//! frame, the same way the world texture is filled.

pub type Rgba = [u8; 4];

pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; (width * height * 4) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Rgba) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(((y as u32 * self.width + x as u32) * 4) as usize)
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        let idx = self.index(x, y)?;
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(color)
    }

    /// Write a pixel, ignoring its alpha
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx..idx + 4].copy_from_slice(&color);
        }
    }

    /// Alpha-blend a pixel over what is already there
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        match color[3] {
            0 => {}
            255 => self.pixels[idx..idx + 4].copy_from_slice(&color),
            alpha => {
                let alpha = alpha as u32;
                for channel in 0..3 {
                    let dst = self.pixels[idx + channel] as u32;
                    let src = color[channel] as u32;
                    self.pixels[idx + channel] = ((src * alpha + dst * (255 - alpha)) / 255) as u8;
                }
                self.pixels[idx + 3] = 255;
            }
        }
    }

    /// Filled rectangle, blended when `color` is translucent
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// One pixel wide rectangle outline
    pub fn outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.fill_rect(x, y + 1, 1, h - 2, color);
        self.fill_rect(x + w - 1, y + 1, 1, h - 2, color);
    }

    /// Darken the whole canvas toward black by `alpha`
    pub fn fade(&mut self, alpha: u8) {
        let (w, h) = (self.width as i32, self.height as i32);
        self.fill_rect(0, 0, w, h, [0, 0, 0, alpha]);
    }
}

/// Same color with its alpha scaled by `factor`
pub fn with_alpha(color: Rgba, factor: f32) -> Rgba {
    let alpha = (color[3] as f32 * factor.clamp(0.0, 1.0)).round() as u8;
    [color[0], color[1], color[2], alpha]
}

/// Scale the RGB channels, keeping alpha
pub fn shade(color: Rgba, factor: f32) -> Rgba {
    let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
    [scale(color[0]), scale(color[1]), scale(color[2]), color[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_rect(-4, -4, 6, 6, [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(canvas.get_pixel(8, 0), None);
    }

    #[test]
    fn test_blend_half_alpha() {
        let mut canvas = Canvas::new(1, 1);
        canvas.clear([0, 0, 0, 255]);
        canvas.blend_pixel(0, 0, [255, 255, 255, 128]);
        assert_eq!(canvas.get_pixel(0, 0), Some([128, 128, 128, 255]));

        canvas.blend_pixel(0, 0, [10, 20, 30, 0]);
        assert_eq!(canvas.get_pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn test_outline_leaves_inside_untouched() {
        let mut canvas = Canvas::new(5, 5);
        canvas.outline_rect(0, 0, 5, 5, [1, 2, 3, 255]);
        assert_eq!(canvas.get_pixel(0, 4), Some([1, 2, 3, 255]));
        assert_eq!(canvas.get_pixel(4, 2), Some([1, 2, 3, 255]));
        assert_eq!(canvas.get_pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_full_fade_is_black() {
        let mut canvas = Canvas::new(2, 2);
        canvas.clear([200, 100, 50, 255]);
        canvas.fade(255);
        assert_eq!(canvas.get_pixel(1, 1), Some([0, 0, 0, 255]));
        assert_eq!(canvas.as_bytes().len(), 16);
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(with_alpha([1, 2, 3, 200], 0.5), [1, 2, 3, 100]);
        assert_eq!(shade([100, 200, 250, 7], 0.5), [50, 100, 125, 7]);
    }
}
