use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::image_crate::io::Reader as ImageReader;
use printpdf::image_crate::DynamicImage;
use printpdf::{
    BuiltinFont, Image, ImageTransform, Mm, PdfDocument, PdfLayerReference, Pt,
};
use tracing::warn;

use super::layout::{FontWeight, Layout, LogoPlacement, PAGE_HEIGHT, PAGE_WIDTH};
use super::RenderError;

const LOGO_DPI: f32 = 300.0;

fn pdf_err(err: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(err.to_string())
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

pub(super) fn write(
    layout: &Layout,
    title: &str,
    logo: Option<&Path>,
    target: &Path,
) -> Result<(), RenderError> {
    let (width, height) = (mm(PAGE_WIDTH), mm(PAGE_HEIGHT));
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(width, height, "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };

        if index == 0 {
            if let (Some(path), Some(placement)) = (logo, layout.logo) {
                if let Err(err) = place_logo(&layer, path, placement) {
                    warn!(path = %path.display(), error = %err, "could not add certificate logo");
                }
            }
        }

        for line in &page.lines {
            let font = match line.weight {
                FontWeight::Regular => &regular,
                FontWeight::Bold => &bold,
            };
            layer.use_text(line.text.as_str(), line.size, mm(line.x), mm(line.y), font);
        }
    }

    let file = File::create(target).map_err(|source| RenderError::Io {
        path: target.to_path_buf(),
        source,
    })?;
    doc.save(&mut BufWriter::new(file)).map_err(pdf_err)?;

    Ok(())
}

fn place_logo(
    layer: &PdfLayerReference,
    path: &Path,
    placement: LogoPlacement,
) -> Result<(), RenderError> {
    let image = Image::from_dynamic_image(&decode_logo(path)?);

    let natural_width = image.image.width.0 as f32 * 72.0 / LOGO_DPI;
    let natural_height = image.image.height.0 as f32 * 72.0 / LOGO_DPI;
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return Err(RenderError::Pdf("logo has no pixels".into()));
    }
    let scale = (placement.max_width / natural_width).min(placement.max_height / natural_height);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(placement.x)),
            translate_y: Some(mm(placement.y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(LOGO_DPI),
            ..Default::default()
        },
    );

    Ok(())
}

/// Decodes the logo by sniffing its content, so the file extension does not
/// have to match the format.
fn decode_logo(path: &Path) -> Result<DynamicImage, RenderError> {
    let io_err = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(io_err)?
        .decode()
        .map_err(pdf_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::image_crate::ImageFormat;

    #[test]
    fn logo_format_is_detected_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        DynamicImage::new_rgb8(8, 4)
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();

        let logo = decode_logo(&path).unwrap();

        assert_eq!((logo.width(), logo.height()), (8, 4));
    }

    #[test]
    fn unreadable_logo_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(matches!(decode_logo(&path), Err(RenderError::Pdf(_))));
        assert!(matches!(
            decode_logo(&dir.path().join("missing.png")),
            Err(RenderError::Io { .. })
        ));
    }
}
