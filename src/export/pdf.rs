//! PDF writer for the screenshot export.
//!
//! Builds the whole document in memory with `lopdf`, then writes it once
//! through a temporary file that is renamed over the destination.

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::layout::{self, PageLayout, Placement};
use crate::collection::ScreenshotRecord;

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;
const CAPTION_FONT: &str = "F1";
const CAPTION_FONT_SIZE: i64 = 8;
const CAPTION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No screenshots to export")]
    NoScreenshots,

    #[error("Failed to read image {path}: {source}")]
    SourceImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to build PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to serialize PDF: {0}")]
    Serialize(#[from] std::io::Error),

    #[error("Failed to write {path}: {source}")]
    Destination {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What an export produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub images: usize,
}

/// Writes `records`, in order and two per page, to a PDF at `destination`.
///
/// Nothing is written unless every image could be read and the document
/// was built completely.
pub fn export_pdf(
    records: &[ScreenshotRecord],
    destination: &Path,
) -> Result<ExportSummary, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoScreenshots);
    }

    let mut builder = PdfBuilder::new();
    for (page, chunk) in records.chunks(layout::IMAGES_PER_PAGE).enumerate() {
        let images = chunk
            .iter()
            .map(|record| load_image(record.storage_path()))
            .collect::<Result<Vec<_>, _>>()?;
        let sizes: Vec<(u32, u32)> = images.iter().map(PageImage::dimensions).collect();
        let page_layout = layout::plan_page(page + 1, 0, &sizes);
        builder.add_page(&page_layout, chunk, images)?;
    }

    let summary = ExportSummary {
        pages: builder.page_count(),
        images: records.len(),
    };
    let bytes = builder.finish()?;
    write_atomically(destination, &bytes)?;

    log::info!(
        "Exported {} screenshot(s) on {} page(s) to {}",
        summary.images,
        summary.pages,
        destination.display()
    );
    Ok(summary)
}

/// An image ready to embed in a page.
enum PageImage {
    /// Decoded pixels, embedded as a Flate-compressed stream.
    Raw(RgbImage),
    /// A JPEG file, embedded byte for byte as a DCT stream.
    Jpeg {
        bytes: Vec<u8>,
        width: u32,
        height: u32,
    },
}

impl PageImage {
    fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Raw(image) => image.dimensions(),
            Self::Jpeg { width, height, .. } => (*width, *height),
        }
    }
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

/// Loads a stored screenshot. JPEG files are passed through untouched so the
/// export stays as small as the captures; anything else is decoded to RGB.
fn load_image(path: &Path) -> Result<PageImage, ExportError> {
    let to_error = |source| ExportError::SourceImage {
        path: path.to_path_buf(),
        source,
    };

    if is_jpeg(path) {
        let (width, height) = image::image_dimensions(path).map_err(to_error)?;
        let bytes = fs::read(path).map_err(|e| to_error(image::ImageError::IoError(e)))?;
        return Ok(PageImage::Jpeg {
            bytes,
            width,
            height,
        });
    }

    image::open(path)
        .map(|image| PageImage::Raw(image.to_rgb8()))
        .map_err(to_error)
}

struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    kids: Vec<Object>,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Oblique",
        });

        Self {
            doc,
            pages_id,
            font_id,
            kids: Vec::new(),
        }
    }

    fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Adds one page. `slot.index` in `page` indexes into `records` and `images`.
    fn add_page(
        &mut self,
        page: &PageLayout,
        records: &[ScreenshotRecord],
        images: Vec<PageImage>,
    ) -> Result<(), ExportError> {
        let mut xobjects = Dictionary::new();
        let mut operations = Vec::new();
        let mut images: Vec<Option<PageImage>> = images.into_iter().map(Some).collect();

        for slot in &page.slots {
            let Some(image) = images.get_mut(slot.index).and_then(Option::take) else {
                continue;
            };
            let record = &records[slot.index];

            let name = format!("Im{}", slot.index + 1);
            let image_id = self.doc.add_object(image_xobject(image));
            xobjects.set(name.as_bytes().to_vec(), image_id);

            operations.extend(draw_image(&name, &slot.placement));
            let caption = format!(
                "Taken: {}",
                record.captured_at().format(CAPTION_TIME_FORMAT)
            );
            operations.extend(draw_text(
                slot.placement.x,
                slot.placement.caption_y,
                &caption,
            ));
        }

        let (number_x, number_y) = layout::page_number_position();
        operations.extend(draw_text(number_x, number_y, &page.page_number_label()));

        let content = Content { operations };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));
        let resources_id = self.doc.add_object(dictionary! {
            "Font" => dictionary! { CAPTION_FONT => self.font_id },
            "XObject" => xobjects,
        });
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        self.kids.push(page_id.into());
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        let count = self.kids.len() as i64;
        let media_box: Vec<Object> = vec![
            0i64.into(),
            0i64.into(),
            (layout::PAGE_WIDTH * PT_PER_MM).into(),
            (layout::PAGE_HEIGHT * PT_PER_MM).into(),
        ];
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
            "MediaBox" => media_box,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn image_xobject(image: PageImage) -> Stream {
    let (width, height) = image.dimensions();
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8i64,
    };

    match image {
        PageImage::Raw(image) => Stream::new(dict, image.into_raw()),
        PageImage::Jpeg { bytes, .. } => {
            dict.set("Filter", "DCTDecode");
            Stream::new(dict, bytes).with_compression(false)
        }
    }
}

/// Converts a top-left based y in millimetres to a PDF y in points.
fn pdf_y(y: f32) -> f32 {
    (layout::PAGE_HEIGHT - y) * PT_PER_MM
}

fn draw_image(name: &str, placement: &Placement) -> Vec<Operation> {
    let width = placement.width * PT_PER_MM;
    let height = placement.height * PT_PER_MM;
    let x = placement.x * PT_PER_MM;
    let y = pdf_y(placement.y + placement.height);

    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                width.into(),
                0i64.into(),
                0i64.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

fn draw_text(x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(CAPTION_FONT.as_bytes().to_vec()),
                CAPTION_FONT_SIZE.into(),
            ],
        ),
        Operation::new("Td", vec![(x * PT_PER_MM).into(), pdf_y(y).into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Writes `bytes` to a temporary file next to `destination`, then renames it
/// into place.
fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let to_error = |source| ExportError::Destination {
        path: destination.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(to_error)?;
    file.write_all(bytes).map_err(to_error)?;
    file.flush().map_err(to_error)?;
    file.persist(destination).map_err(|e| to_error(e.error))?;
    Ok(())
}
