use pdf_writer::{Filter, Pdf, Ref};

use crate::error::Error;
use crate::probe::{self, ImageKind};

/// Write `data` as an image XObject and return its reference.
///
/// JPEG bytes pass through untouched with DCTDecode in the colour space their
/// frame declares; PNG is decoded and re-compressed as Flate RGB with a
/// separate alpha soft mask when needed.
pub(super) fn embed_image(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    data: &[u8],
) -> Result<Ref, Error> {
    match probe::sniff(data) {
        Some(ImageKind::Jpeg) => {
            let frame = probe::probe_jpeg(data).map_err(|e| Error::Image(e.to_string()))?;
            if !matches!(frame.components, 1 | 3 | 4) {
                return Err(Error::Image(format!(
                    "unsupported JPEG with {} components",
                    frame.components
                )));
            }
            let xobj_ref = alloc();
            let mut xobj = pdf.image_xobject(xobj_ref, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(frame.width as i32);
            xobj.height(frame.height as i32);
            let space = xobj.color_space();
            match frame.components {
                1 => space.device_gray(),
                4 => space.device_cmyk(),
                _ => space.device_rgb(),
            }
            xobj.bits_per_component(8);
            Ok(xobj_ref)
        }
        Some(ImageKind::Png) => {
            let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Png)
                .map_err(|e| Error::Image(e.to_string()))?;
            let rgba: image::RgbaImage = decoded.to_rgba8();
            let (w, h) = (rgba.width(), rgba.height());
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb_data: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

            let smask_ref = if has_alpha {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w as i32);
                mask.height(h as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let xobj_ref = alloc();
            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
            Ok(xobj_ref)
        }
        None => Err(Error::Image("unsupported image format".into())),
    }
}
