//! Image/label overlay compositing.
//!
//! Produces the blended preview raster: the raw image with the label mask
//! painted over it at a configurable transparency. Blending happens on
//! RGBA so the result is directly displayable by whatever draws it.

use std::path::Path;

use image::RgbaImage;

use crate::error::ViewerError;

/// Alpha-blend two equally sized RGBA rasters.
///
/// Channel-wise linear interpolation `image * (1 - alpha) + label * alpha`,
/// rounded to the nearest 8-bit value. `alpha` is clamped to `[0, 1]`: at
/// 0 the result equals `image`, at 1 it equals `label`.
pub fn blend_rgba(
    image: &RgbaImage,
    label: &RgbaImage,
    alpha: f32,
) -> Result<RgbaImage, ViewerError> {
    let (image_width, image_height) = image.dimensions();
    let (label_width, label_height) = label.dimensions();
    if (image_width, image_height) != (label_width, label_height) {
        return Err(ViewerError::DimensionMismatch {
            image_width,
            image_height,
            label_width,
            label_height,
        });
    }

    let alpha = alpha.clamp(0.0, 1.0);
    let mut blended = RgbaImage::new(image_width, image_height);
    for (out, (a, b)) in blended
        .pixels_mut()
        .zip(image.pixels().zip(label.pixels()))
    {
        for channel in 0..4 {
            let mixed =
                f32::from(a[channel]) * (1.0 - alpha) + f32::from(b[channel]) * alpha;
            out[channel] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(blended)
}

/// Load an image/label pair from disk and composite them.
///
/// Both rasters are converted to RGBA before blending. Fails with
/// [`ViewerError::Decode`] naming the unreadable file, or with
/// [`ViewerError::DimensionMismatch`] when the rasters disagree in size;
/// pairing guarantees matching stems, not matching dimensions, so the
/// check lives here.
pub fn compose(image_path: &Path, label_path: &Path, alpha: f32) -> Result<RgbaImage, ViewerError> {
    let image = open_rgba(image_path)?;
    let label = open_rgba(label_path)?;
    blend_rgba(&image, &label, alpha)
}

fn open_rgba(path: &Path) -> Result<RgbaImage, ViewerError> {
    let raster = image::open(path).map_err(|source| ViewerError::decode(path, source))?;
    Ok(raster.to_rgba8())
}
