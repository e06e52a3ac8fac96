use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::imageops;
use image::{
    DynamicImage, ImageBuffer, ImageEncoder, ImageError, Pixel, PixelWithColorType, RgbImage,
    RgbaImage,
};

use crate::config::{IconSetConfig, Resampling, Rgb};
use crate::error::ToolError;

/// Decode an image file, keeping the path in the error.
pub fn load(path: &Path) -> Result<DynamicImage, ToolError> {
    image::open(path).map_err(|source| ToolError::ImageDecode { path: path.to_path_buf(), source })
}

/// Offsets and side of the centered square inside a `w`×`h` image.
pub fn crop_offsets(w: u32, h: u32) -> (u32, u32, u32) {
    let side = w.min(h);
    ((w - side) / 2, (h - side) / 2, side)
}

/// Crop to a centered square using the shorter edge. Square input is returned unchanged.
pub fn center_crop_square(img: &RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == h {
        return img.clone();
    }
    let (left, top, side) = crop_offsets(w, h);
    imageops::crop_imm(img, left, top, side, side).to_image()
}

pub fn resize_square<P>(img: &ImageBuffer<P, Vec<u8>>, side: u32, filter: Resampling) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    if img.dimensions() == (side, side) {
        return img.clone();
    }
    imageops::resize(img, side, side, filter.filter_type())
}

/// Composite over an opaque background, dropping the alpha channel.
pub fn flatten(img: &RgbaImage, background: Rgb) -> RgbImage {
    let Rgb(bg) = background;
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        image::Rgb([blend(r, bg[0], a), blend(g, bg[1], a), blend(b, bg[2], a)])
    })
}

#[inline]
fn blend(src: u8, bg: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}

/// Square, resized and flattened canvas every icon in a set is cut from.
pub fn master_canvas(source: &DynamicImage, cfg: &IconSetConfig) -> RgbImage {
    let square = center_crop_square(&source.to_rgba8());
    let canvas = resize_square(&square, cfg.canvas_size, cfg.filter);
    flatten(&canvas, cfg.background)
}

/// Encode as PNG, creating or truncating `path`.
pub fn write_png<P>(path: &Path, img: &ImageBuffer<P, Vec<u8>>) -> io::Result<()>
where
    P: PixelWithColorType<Subpixel = u8>,
{
    let mut out = BufWriter::new(File::create(path)?);
    PngEncoder::new(&mut out)
        .write_image(img.as_raw(), img.width(), img.height(), P::COLOR_TYPE)
        .map_err(|e| match e {
            ImageError::IoError(err) => err,
            other => io::Error::other(other),
        })?;
    out.flush()
}
