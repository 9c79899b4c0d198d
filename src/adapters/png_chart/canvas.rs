//! Pixel drawing primitives. Coordinates are signed and clipped to the image.

use image::{Rgb, RgbImage};

pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const GRID_GRAY: Rgb<u8> = Rgb([230, 230, 230]);
}

pub fn rgb(c: [u8; 3]) -> Rgb<u8> {
    Rgb(c)
}

pub fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < u64::from(img.width()) && (y as u64) < u64::from(img.height())
    {
        img.put_pixel(x as u32, y as u32, color);
    }
}

pub fn fill_rect(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    let (xa, xb) = (x0.min(x1), x0.max(x1));
    let (ya, yb) = (y0.min(y1), y0.max(y1));
    for y in ya..=yb {
        for x in xa..=xb {
            put(img, x, y, color);
        }
    }
}

pub fn stroke_rect(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    horizontal_line(img, y0, x0, x1, color);
    horizontal_line(img, y1, x0, x1, color);
    vertical_line(img, x0, y0, y1, color);
    vertical_line(img, x1, y0, y1, color);
}

pub fn vertical_line(img: &mut RgbImage, x: i64, y0: i64, y1: i64, color: Rgb<u8>) {
    fill_rect(img, x, y0, x, y1, color);
}

pub fn horizontal_line(img: &mut RgbImage, y: i64, x0: i64, x1: i64, color: Rgb<u8>) {
    fill_rect(img, x0, y, x1, y, color);
}
