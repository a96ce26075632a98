//! Page geometry for the PDF export.
//!
//! All values are millimetres on an A4 page, measured from the top-left
//! corner. The PDF writer converts to points and flips the y axis.

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Images are never taller than 40% of the page.
pub const MAX_IMAGE_HEIGHT: f32 = PAGE_HEIGHT * 0.4;
/// Vertical gap between the first image's caption area and the second image.
pub const SPACING: f32 = 10.0;
/// Room reserved below the first image for its caption.
pub const CAPTION_CLEARANCE: f32 = 10.0;
/// Distance from an image's bottom edge to its caption baseline.
pub const CAPTION_OFFSET: f32 = 5.0;
/// Page numbers sit this far left of the right margin.
pub const PAGE_NUMBER_INSET: f32 = 20.0;

pub const IMAGES_PER_PAGE: usize = 2;

/// Where one image and its caption go on a page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f32,
    /// Top edge of the image
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Baseline of the caption under the image
    pub caption_y: f32,
}

/// One image slot: which input image, and where it goes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    pub index: usize,
    pub placement: Placement,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    /// 1-based page number
    pub number: usize,
    pub slots: Vec<Slot>,
}

impl PageLayout {
    pub fn page_number_label(&self) -> String {
        format!("Page {}", self.number)
    }
}

/// Baseline position of the page number.
pub fn page_number_position() -> (f32, f32) {
    (PAGE_WIDTH - MARGIN - PAGE_NUMBER_INSET, PAGE_HEIGHT - MARGIN)
}

/// Scales a `width`x`height` image to fit within `max_width`x`max_height`.
///
/// The scale factor is the smaller of the two side ratios, so the aspect
/// ratio is kept and nothing is cropped. Small images are scaled up.
pub fn fit_within(width: u32, height: u32, max_width: f32, max_height: f32) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (0.0, 0.0);
    }
    let scale = f32::min(max_width / width as f32, max_height / height as f32);
    (width as f32 * scale, height as f32 * scale)
}

/// Lays out one page. `first_index` is the input index of the first image,
/// `sizes` holds the pixel sizes of the one or two images on the page.
pub fn plan_page(number: usize, first_index: usize, sizes: &[(u32, u32)]) -> PageLayout {
    let mut slots = Vec::with_capacity(IMAGES_PER_PAGE);
    let mut y = MARGIN;

    for (offset, &(width, height)) in sizes.iter().take(IMAGES_PER_PAGE).enumerate() {
        let (width, height) = fit_within(width, height, CONTENT_WIDTH, MAX_IMAGE_HEIGHT);
        slots.push(Slot {
            index: first_index + offset,
            placement: Placement {
                x: MARGIN,
                y,
                width,
                height,
                caption_y: y + height + CAPTION_OFFSET,
            },
        });
        y += height + SPACING + CAPTION_CLEARANCE;
    }

    PageLayout { number, slots }
}
