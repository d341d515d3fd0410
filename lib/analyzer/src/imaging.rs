//! Image preparation: square tiles, side-by-side composites, dominant color.

use ahash::AHashMap;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Side of the thumbnail the dominant color is computed on
const COLOR_THUMBNAIL: u32 = 150;

/// Resize to a `size`×`size` square, ignoring aspect ratio.
pub fn tile(image: &RgbImage, size: u32) -> RgbImage {
    if image.width() == size && image.height() == size {
        return image.clone();
    }
    imageops::resize(image, size, size, FilterType::Triangle)
}

/// Lay images out left to right, each resized to a `size` square.
///
/// Two images give a `2·size`×`size` canvas, three a `3·size`×`size` one. `size` is bounded by
/// [`MAX_TILE_SIZE`](crate::config::MAX_TILE_SIZE) in validated configurations.
pub fn compose_side_by_side(images: &[&RgbImage], size: u32) -> RgbImage {
    let mut canvas = RgbImage::new(size * images.len() as u32, size);
    for (idx, image) in images.iter().enumerate() {
        let tile = tile(image, size);
        imageops::replace(&mut canvas, &tile, i64::from(size) * idx as i64, 0);
    }
    canvas
}

/// Most frequent pixel of a 150×150 thumbnail. Ties go to the pixel seen first.
pub fn dominant_color(image: &RgbImage) -> Option<[u8; 3]> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    let thumbnail = imageops::resize(image, COLOR_THUMBNAIL, COLOR_THUMBNAIL, FilterType::Nearest);

    let mut counts: AHashMap<[u8; 3], (usize, usize)> = AHashMap::new();
    for (order, pixel) in thumbnail.pixels().enumerate() {
        counts.entry(pixel.0).or_insert((0, order)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(color, _)| color)
}
