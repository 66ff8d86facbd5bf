//! Image to PDF composition, one page per image.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PdfMixError, Result};

const POINTS_PER_INCH: f64 = 72.0;
const MM_PER_INCH: f64 = 25.4;

/// Image file extensions accepted as input.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// 210 x 297 mm.
    A4,
    /// 297 x 420 mm.
    A3,
    /// 8.5 x 11 in.
    Letter,
    /// 8.5 x 14 in.
    Legal,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            Self::A4 => (595.276, 841.890),
            Self::A3 => (841.890, 1190.551),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
        }
    }
}

impl FromStr for PageSize {
    type Err = PdfMixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            other => Err(PdfMixError::invalid_argument(format!(
                "Unknown page size '{other}'. Valid sizes: a4, a3, letter, legal"
            ))),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
        };
        f.write_str(name)
    }
}

/// How images are placed on pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLayout {
    /// Fit images onto this paper size; `None` makes each page the size of
    /// its image at `dpi`.
    pub page_size: Option<PageSize>,

    /// Margin on every side, in millimetres. Only used with a page size.
    pub margin_mm: f64,

    /// Keep the image's aspect ratio when fitting; otherwise stretch to the
    /// area inside the margins.
    pub keep_aspect: bool,

    /// Centre the image on the page; otherwise place it at the top-left margin.
    pub center: bool,

    /// Resolution used to size pages when there is no page size.
    pub dpi: u32,

    /// Sort inputs by file name, ignoring case, before composing.
    pub sort_by_name: bool,
}

impl Default for ImageLayout {
    fn default() -> Self {
        Self {
            page_size: Some(PageSize::A4),
            margin_mm: 10.0,
            keep_aspect: true,
            center: true,
            dpi: 300,
            sort_by_name: true,
        }
    }
}

impl ImageLayout {
    /// Check that the layout can be applied.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(PdfMixError::invalid_config("DPI must be greater than zero"));
        }
        if !self.margin_mm.is_finite() || self.margin_mm < 0.0 {
            return Err(PdfMixError::invalid_config("Margin must be a non-negative number"));
        }
        Ok(())
    }

    /// Margin in points.
    pub fn margin_points(&self) -> f64 {
        self.margin_mm * POINTS_PER_INCH / MM_PER_INCH
    }

    /// Where an image of `width` x `height` pixels goes on its page.
    pub fn place(&self, width: u32, height: u32) -> Placement {
        let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));

        let Some(page_size) = self.page_size else {
            let scale = POINTS_PER_INCH / f64::from(self.dpi.max(1));
            return Placement {
                page_width: w * scale,
                page_height: h * scale,
                x: 0.0,
                y: 0.0,
                width: w * scale,
                height: h * scale,
            };
        };

        let (page_width, page_height) = page_size.dimensions();
        let margin = self.margin_points();
        let avail_w = (page_width - 2.0 * margin).max(1.0);
        let avail_h = (page_height - 2.0 * margin).max(1.0);

        let (width, height) = if self.keep_aspect {
            let scale = (avail_w / w).min(avail_h / h);
            (w * scale, h * scale)
        } else {
            (avail_w, avail_h)
        };

        let (x, y) = if self.center {
            ((page_width - width) / 2.0, (page_height - height) / 2.0)
        } else {
            (margin, page_height - margin - height)
        };

        Placement {
            page_width,
            page_height,
            x,
            y,
            width,
            height,
        }
    }
}

/// Page size and image rectangle, in points from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Page width.
    pub page_width: f64,
    /// Page height.
    pub page_height: f64,
    /// Left edge of the image.
    pub x: f64,
    /// Bottom edge of the image.
    pub y: f64,
    /// Drawn image width.
    pub width: f64,
    /// Drawn image height.
    pub height: f64,
}

/// Builds a PDF with one page per image.
#[derive(Debug, Clone, Default)]
pub struct ImageComposer {
    layout: ImageLayout,
}

impl ImageComposer {
    /// Composer using `layout`.
    pub fn new(layout: ImageLayout) -> Self {
        Self { layout }
    }

    /// Active layout.
    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    /// Input order after the optional name sort.
    pub fn ordered(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut ordered = inputs.to_vec();
        if self.layout.sort_by_name {
            ordered.sort_by_key(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().to_lowercase())
                    .unwrap_or_default()
            });
        }
        ordered
    }

    /// Read and decode `inputs`, then lay them out. Blocking.
    pub fn compose(&self, inputs: &[PathBuf]) -> Result<Document> {
        if inputs.is_empty() {
            return Err(PdfMixError::NoInputs);
        }
        self.layout.validate()?;

        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::new();

        for path in self.ordered(inputs) {
            let page_id = self.add_page(&mut doc, pages_id, &path)?;
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }

    fn add_page(&self, doc: &mut Document, pages_id: ObjectId, path: &Path) -> Result<ObjectId> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PdfMixError::file_not_found(path.to_path_buf()),
            _ => PdfMixError::from(e),
        })?;

        let format = image::guess_format(&bytes)
            .map_err(|_| PdfMixError::UnsupportedInput { path: path.to_path_buf() })?;
        let decoded = image::load_from_memory_with_format(&bytes, format).map_err(|e| {
            PdfMixError::conversion_failed(path.to_path_buf(), format!("cannot decode image: {e}"))
        })?;

        let (width, height) = decoded.dimensions();
        let stream = image_stream(&decoded, format, bytes)?;
        let image_id = doc.add_object(stream);

        let placement = self.layout.place(width, height);
        debug!(
            path = %path.display(),
            width,
            height,
            page_width = placement.page_width,
            page_height = placement.page_height,
            "placing image"
        );

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(placement.width),
                        Object::Integer(0),
                        Object::Integer(0),
                        real(placement.height),
                        real(placement.x),
                        real(placement.y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        Ok(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(placement.page_width),
                real(placement.page_height),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
            "Contents" => content_id,
        }))
    }
}

/// Image XObject for a decoded image.
///
/// Baseline gray and RGB JPEGs are embedded as is; anything else is
/// flattened onto white and stored as compressed RGB samples.
fn image_stream(decoded: &DynamicImage, format: ImageFormat, bytes: Vec<u8>) -> Result<Stream> {
    let (width, height) = decoded.dimensions();

    let jpeg_space = match decoded.color() {
        ColorType::L8 => Some("DeviceGray"),
        ColorType::Rgb8 => Some("DeviceRGB"),
        _ => None,
    };
    if format == ImageFormat::Jpeg
        && let Some(color_space) = jpeg_space
    {
        return Ok(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            bytes,
        )
        .with_compression(false));
    }

    let mut stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        flatten_on_white(decoded),
    );
    stream.compress()?;
    Ok(stream)
}

/// RGB samples with any transparency composited over white.
fn flatten_on_white(image: &DynamicImage) -> Vec<u8> {
    let rgba = image.to_rgba8();
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);

    for pixel in rgba.pixels() {
        let alpha = u16::from(pixel[3]);
        for channel in &pixel.0[..3] {
            let blended = (u16::from(*channel) * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }

    rgb
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}
