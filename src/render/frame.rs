use std::io::Cursor;
use std::path::Path;

use anyhow::Context;

use crate::assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::foundation::error::{CardError, CardResult};

/// A rendered card: premultiplied RGBA8 pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl CardImage {
    /// Take over a straight-alpha image, e.g. a previously saved card.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = img.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self {
            width,
            height,
            data,
        }
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_rgba_image(&self) -> CardResult<image::RgbaImage> {
        let mut data = self.data.clone();
        unpremultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(self.width, self.height, data).ok_or_else(|| {
            CardError::encode(format!(
                "pixel buffer does not match {}x{}",
                self.width, self.height
            ))
        })
    }

    /// Pixel at `(x, y)` in straight alpha, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        unpremultiply_rgba8_in_place(&mut px);
        Some(px)
    }

    /// PNG bytes of the card.
    pub fn encode_png(&self) -> CardResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| CardError::encode(format!("png encoding failed: {e}")))?;
        Ok(out)
    }

    /// Write the card as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> CardResult<()> {
        let path = path.as_ref();
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
