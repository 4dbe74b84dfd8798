// ============================================================
// Layer 4 — Image → Tensor Transform
// ============================================================
// Applies an ImageTransform to a decoded image:
//
//   DynamicImage
//       │  optional exact resize (triangle filter)
//       ▼
//   grayscale (Luma8) or RGB8
//       │  u8 → f32 / 255
//       ▼
//   ImageTensor [C, H, W]
//
// RGB pixels are interleaved (HWC) in memory; they are written
// out channel-major so every tensor in the crate is CHW.

use image::{imageops::FilterType, DynamicImage};

use crate::domain::error::DataResult;
use crate::domain::tensor::ImageTensor;
use crate::domain::transform::ImageTransform;

pub fn to_tensor(img: DynamicImage, transform: &ImageTransform) -> DataResult<ImageTensor> {
    let img = match transform.resize {
        Some((w, h)) => img.resize_exact(w, h, FilterType::Triangle),
        None         => img,
    };

    let (width, height) = (img.width() as usize, img.height() as usize);

    let (channels, data) = if transform.grayscale {
        let luma = img.to_luma8().into_raw();
        (1, luma.into_iter().map(|p| p as f32 / 255.0).collect::<Vec<f32>>())
    } else {
        let rgb    = img.to_rgb8().into_raw();
        let plane  = width * height;
        let mut chw = vec![0.0f32; plane * 3];
        for (i, px) in rgb.chunks_exact(3).enumerate() {
            for c in 0..3 {
                chw[c * plane + i] = px[c] as f32 / 255.0;
            }
        }
        (3, chw)
    };

    ImageTensor::new(vec![channels, height, width], data)
}
