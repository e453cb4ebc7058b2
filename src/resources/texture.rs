use std::path::{Path, PathBuf};

use image::{GenericImageView, RgbaImage, imageops::FilterType};

use crate::data_structures::registry::RegistryError;

/// Pixel data ready for upload.
///
/// The image is flipped vertically so that row 0 is the bottom of the picture,
/// matching the texture coordinates the primitive meshes are generated with.
/// Three-channel images are widened to RGBA because wgpu has no 24-bit colour
/// format; `channels` still reports what the file contained.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub path: PathBuf,
    pub channels: u8,
    pub rgba: RgbaImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

/// Decode an image file for use as a scene texture.
///
/// Only 3-channel (RGB) and 4-channel (RGBA) images are accepted.
pub fn decode_image(path: &Path) -> Result<DecodedImage, RegistryError> {
    let img = image::open(path).map_err(|source| RegistryError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let channels = img.color().channel_count();
    let (width, height) = img.dimensions();
    log::info!(
        "Loaded image {}, width: {width}, height: {height}, channels: {channels}",
        path.display()
    );
    if channels != 3 && channels != 4 {
        return Err(RegistryError::UnsupportedChannels {
            path: path.to_path_buf(),
            channels,
        });
    }
    Ok(DecodedImage {
        path: path.to_path_buf(),
        channels,
        rgba: img.flipv().to_rgba8(),
    })
}

/// Number of mip levels down to and including 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Build the full mip chain, starting with `base` itself.
///
/// Each level halves both dimensions (never below 1) using a triangle filter.
pub fn mip_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(base.width(), base.height());
    let mut chain = Vec::with_capacity(levels as usize);
    chain.push(base.clone());
    for _ in 1..levels {
        let prev = &chain[chain.len() - 1];
        let width = (prev.width() / 2).max(1);
        let height = (prev.height() / 2).max(1);
        let next = image::imageops::resize(prev, width, height, FilterType::Triangle);
        chain.push(next);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba};

    #[test]
    fn mip_levels() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 64), 9);
        assert_eq!(mip_level_count(300, 5), 9);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn mip_chain_ends_at_one_by_one() {
        let base = RgbaImage::from_pixel(16, 4, Rgba([200, 100, 50, 255]));
        let chain = mip_chain(&base);
        let dims: Vec<_> = chain.iter().map(|level| level.dimensions()).collect();
        assert_eq!(dims, vec![(16, 4), (8, 2), (4, 1), (2, 1), (1, 1)]);
        // a flat colour stays flat at every level
        assert_eq!(chain[4].get_pixel(0, 0), &Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn decodes_rgb_and_flips_vertically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stripes.png");
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([0, 0, 255]));
        img.save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!(decoded.channels, 3);
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
        assert_eq!(decoded.rgba.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(decoded.rgba.get_pixel(0, 1), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn decodes_rgba_and_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glass.png");
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 64]));
        img.put_pixel(0, 1, Rgba([200, 210, 220, 255]));
        img.save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!(decoded.channels, 4);
        assert_eq!((decoded.width(), decoded.height()), (1, 2));
        assert_eq!(decoded.rgba.get_pixel(0, 0), &Rgba([200, 210, 220, 255]));
        assert_eq!(decoded.rgba.get_pixel(0, 1), &Rgba([10, 20, 30, 64]));
    }

    #[test]
    fn rejects_grayscale_alpha_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        GrayAlphaImage::from_pixel(2, 2, LumaA([128, 200])).save(&path).unwrap();

        assert!(matches!(
            decode_image(&path),
            Err(RegistryError::UnsupportedChannels { channels: 2, .. })
        ));
    }

    #[test]
    fn rejects_grayscale_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(4, 4, Luma([128])).save(&path).unwrap();

        match decode_image(&path) {
            Err(RegistryError::UnsupportedChannels { channels, .. }) => assert_eq!(channels, 1),
            other => panic!("expected a channel error, got {other:?}"),
        }
    }

    #[test]
    fn missing_files_fail_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let result = decode_image(&dir.path().join("nope.jpg"));
        assert!(matches!(result, Err(RegistryError::Decode { .. })));
    }
}
