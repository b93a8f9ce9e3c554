//! Artwork and template decoding.
//!
//! Vector content is parsed with `usvg` and flattened into a list of filled
//! or stroked paths in the graphic's own coordinate space. Raster uploads
//! arrive as base64 data URIs and are decoded with `image` into a
//! premultiplied [`Pixmap`].

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use merchmagic_core::{AssetError, Rgba, Size};
use tiny_skia::{ColorU8, FillRule, Path, Pixmap, Transform};

/// An artwork file handed over by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Original file name, used in error messages.
    pub name: String,
    /// Inline markup or a `data:` URI.
    pub data: String,
    pub is_vector: bool,
}

impl UploadedAsset {
    pub fn vector(name: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: markup.into(),
            is_vector: true,
        }
    }

    /// A raster asset from a `data:image/...;base64,` URI.
    pub fn raster(name: impl Into<String>, data_uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data_uri.into(),
            is_vector: false,
        }
    }

    /// A raster asset from encoded PNG bytes.
    pub fn from_png_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self::raster(name, png_data_uri(bytes))
    }
}

/// Encodes PNG bytes as a `data:image/png;base64,` URI.
pub fn png_data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// Solid stroke of a vector shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStroke {
    pub color: Rgba,
    pub width: f32,
}

/// One drawable path of a vector graphic.
#[derive(Debug, Clone)]
pub struct VectorShape {
    /// Path in the coordinates of its source element.
    pub path: Path,
    /// Maps `path` into the graphic's coordinate space.
    pub transform: Transform,
    pub fill: Option<Rgba>,
    pub fill_rule: FillRule,
    pub stroke: Option<ShapeStroke>,
}

impl VectorShape {
    pub fn is_fillable(&self) -> bool {
        self.fill.is_some()
    }
}

/// A parsed vector document.
#[derive(Debug, Clone)]
pub struct VectorGraphic {
    size: Size,
    shapes: Vec<VectorShape>,
}

impl VectorGraphic {
    /// Parses SVG markup. Fails when the markup is empty, malformed or has
    /// nothing drawable in it.
    pub fn parse(name: &str, markup: &str) -> Result<Self, AssetError> {
        if markup.trim().is_empty() {
            return Err(AssetError::parse(name, "empty vector source"));
        }

        let options = usvg::Options::default();
        let tree = usvg::Tree::from_str(markup, &options)
            .map_err(|e| AssetError::parse(name, e.to_string()))?;

        let mut shapes = Vec::new();
        collect_shapes(tree.root(), &mut shapes);
        if shapes.is_empty() {
            return Err(AssetError::parse(name, "document contains no drawable shapes"));
        }

        let size = tree.size();
        tracing::debug!(
            "Parsed vector '{}': {}x{}, {} shapes",
            name,
            size.width(),
            size.height(),
            shapes.len()
        );

        Ok(Self {
            size: Size::new(size.width() as f64, size.height() as f64),
            shapes,
        })
    }

    /// Natural (unscaled) size.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn shapes(&self) -> &[VectorShape] {
        &self.shapes
    }

    /// Replaces the fill of every fillable shape, keeping each fill's alpha.
    /// Stroke-only shapes are untouched. Returns the number of shapes changed.
    pub fn recolor(&mut self, color: Rgba) -> usize {
        let mut changed = 0;
        for shape in &mut self.shapes {
            if let Some(fill) = shape.fill.as_mut() {
                *fill = Rgba { a: fill.a, ..color };
                changed += 1;
            }
        }
        changed
    }
}

fn collect_shapes(group: &usvg::Group, out: &mut Vec<VectorShape>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_shapes(g, out),
            usvg::Node::Path(p) => {
                if let Some(shape) = convert_path(p) {
                    out.push(shape);
                }
            }
            usvg::Node::Text(t) => collect_shapes(t.flattened(), out),
            // Nested bitmaps in vector uploads are not rendered.
            usvg::Node::Image(_) => {}
        }
    }
}

fn convert_path(path: &usvg::Path) -> Option<VectorShape> {
    if !path.is_visible() {
        return None;
    }

    let fill = path
        .fill()
        .map(|f| paint_color(f.paint(), f.opacity().get()));
    let fill_rule = match path.fill().map(|f| f.rule()) {
        Some(usvg::FillRule::EvenOdd) => FillRule::EvenOdd,
        _ => FillRule::Winding,
    };
    let stroke = path.stroke().map(|s| ShapeStroke {
        color: paint_color(s.paint(), s.opacity().get()),
        width: s.width().get(),
    });

    if fill.is_none() && stroke.is_none() {
        return None;
    }

    Some(VectorShape {
        path: path.data().clone(),
        transform: path.abs_transform(),
        fill,
        fill_rule,
        stroke,
    })
}

/// Gradients and patterns are approximated by a single solid colour.
fn paint_color(paint: &usvg::Paint, opacity: f32) -> Rgba {
    let first_stop = |stops: &[usvg::Stop]| {
        stops
            .first()
            .map(|s| (s.color(), s.opacity().get()))
            .unwrap_or((usvg::Color::black(), 1.0))
    };
    let (color, stop_opacity) = match paint {
        usvg::Paint::Color(c) => (*c, 1.0),
        usvg::Paint::LinearGradient(g) => first_stop(g.stops()),
        usvg::Paint::RadialGradient(g) => first_stop(g.stops()),
        usvg::Paint::Pattern(_) => (usvg::Color::black(), 1.0),
    };
    Rgba::with_alpha_f(color.red, color.green, color.blue, opacity * stop_opacity)
}

/// A decoded raster image, premultiplied.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixmap: Arc<Pixmap>,
}

impl RasterImage {
    /// Decodes a `data:` URI holding base64-encoded image bytes.
    pub fn from_data_uri(name: &str, data: &str) -> Result<Self, AssetError> {
        let (header, payload) = split_data_uri(name, data)?;
        if !header.ends_with(";base64") {
            return Err(AssetError::parse(name, "raster data URI is not base64 encoded"));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| AssetError::parse(name, e.to_string()))?;
        Self::from_bytes(name, &bytes)
    }

    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        if bytes.is_empty() {
            return Err(AssetError::parse(name, "empty image data"));
        }
        let image = image::load_from_memory(bytes)
            .map_err(|e| AssetError::parse(name, e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            AssetError::parse(name, format!("invalid image size {}x{}", width, height))
        })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(Self {
            pixmap: Arc::new(pixmap),
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.pixmap.width() as f64, self.pixmap.height() as f64)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// Decoded artwork content.
#[derive(Debug, Clone)]
pub enum ArtworkContent {
    Vector(VectorGraphic),
    Raster(RasterImage),
}

impl ArtworkContent {
    /// Decodes an upload according to its declared kind.
    pub fn decode(asset: &UploadedAsset) -> Result<Self, AssetError> {
        if asset.is_vector {
            let markup = vector_markup(&asset.name, &asset.data)?;
            VectorGraphic::parse(&asset.name, &markup).map(Self::Vector)
        } else {
            RasterImage::from_data_uri(&asset.name, &asset.data).map(Self::Raster)
        }
    }

    pub fn size(&self) -> Size {
        match self {
            Self::Vector(v) => v.size(),
            Self::Raster(r) => r.size(),
        }
    }
}

/// Vector uploads may be inline markup or a `data:image/svg+xml` URI.
fn vector_markup(name: &str, data: &str) -> Result<String, AssetError> {
    if !data.trim_start().starts_with("data:") {
        return Ok(data.to_string());
    }
    let (header, payload) = split_data_uri(name, data)?;
    if header.ends_with(";base64") {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| AssetError::parse(name, e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AssetError::parse(name, e.to_string()))
    } else {
        Ok(payload.to_string())
    }
}

fn split_data_uri<'a>(name: &str, data: &'a str) -> Result<(&'a str, &'a str), AssetError> {
    let data = data.trim_start();
    if !data.starts_with("data:") {
        return Err(AssetError::parse(name, "expected a data URI"));
    }
    data.split_once(',')
        .ok_or_else(|| AssetError::parse(name, "malformed data URI"))
}
