//! Scene renderer
//! Rasterizes the scene graph with tiny-skia, both for the live surface and
//! for flattened exports.
//!
//! Features:
//! - Anti-aliased vector rendering
//! - Blurred drop shadows beneath vector objects
//! - Gradient and texture overlays with blend modes
//! - Dashed print-area guide and selection handles (live view only)
//! - PNG encoding of the final raster

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use merchmagic_core::{RenderError, Rgba, Size};
use tiny_skia::{
    BlendMode, Color, FillRule, FilterQuality, GradientStop, IntSize, LinearGradient, Paint,
    PathBuilder, Pixmap, PixmapPaint, SpreadMode, Stroke, StrokeDash, Transform,
};

use crate::assets::{ArtworkContent, RasterImage, VectorGraphic};
use crate::scene::{ObjectKind, OverlayContent, SceneGraph, SceneObject, Shadow};

/// Largest raster edge the renderer will allocate.
pub const MAX_RENDER_DIMENSION: u32 = 16_384;

const HANDLE_SIZE: f32 = 8.0;

const GUIDE_STROKE: Rgba = Rgba::new(15, 23, 42, 89);
const GUIDE_FILL: Rgba = Rgba::new(15, 23, 42, 13);
const SELECTION_BORDER: Rgba = Rgba::opaque(0x1d, 0x4e, 0xd8);
const SELECTION_HANDLE: Rgba = Rgba::opaque(0x25, 0x63, 0xeb);

/// What to draw besides the exportable objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Draw non-exportable guides.
    pub include_guides: bool,
    /// Outline selected objects and draw their corner handles.
    pub selection_frame: bool,
}

impl RenderOptions {
    /// Options for flattened exports: exportable objects only.
    pub fn export() -> Self {
        Self::default()
    }

    /// Options for the live editing surface.
    pub fn live() -> Self {
        Self {
            include_guides: true,
            selection_frame: true,
        }
    }
}

/// Renders `scene` into a new `width` x `height` raster. `view` maps canvas
/// coordinates to pixels.
pub fn render_scene(
    scene: &SceneGraph,
    background: Option<Rgba>,
    width: u32,
    height: u32,
    view: Transform,
    options: RenderOptions,
) -> Result<Pixmap, RenderError> {
    if width > MAX_RENDER_DIMENSION || height > MAX_RENDER_DIMENSION {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
    if let Some(bg) = background {
        pixmap.fill(to_color(bg, 1.0));
    }

    for object in scene.iter() {
        if !object.exportable && !options.include_guides {
            continue;
        }
        draw_object(&mut pixmap, object, view);
    }

    if options.selection_frame {
        for object in scene.iter().filter(|o| o.selected) {
            draw_selection(&mut pixmap, object, view);
        }
    }

    Ok(pixmap)
}

/// Maps an object's natural box (origin top-left) onto the canvas.
pub fn object_transform(object: &SceneObject) -> Transform {
    let scale = object.scale as f32;
    Transform::from_translate(object.position.x as f32, object.position.y as f32)
        .pre_rotate(object.angle as f32)
        .pre_scale(scale, scale)
        .pre_translate(
            -(object.size.width / 2.0) as f32,
            -(object.size.height / 2.0) as f32,
        )
}

fn draw_object(pixmap: &mut Pixmap, object: &SceneObject, view: Transform) {
    let local = object_transform(object);
    let ts = view.pre_concat(local);

    match &object.kind {
        ObjectKind::Garment(graphic) | ObjectKind::Artwork(ArtworkContent::Vector(graphic)) => {
            if let Some(shadow) = &object.shadow {
                draw_shadow(pixmap, graphic, shadow, local, view);
            }
            draw_vector(pixmap, graphic, ts, object.opacity, object.blend_mode);
        }
        ObjectKind::Artwork(ArtworkContent::Raster(raster)) => {
            draw_raster(pixmap, raster, ts, object.opacity, object.blend_mode);
        }
        ObjectKind::PrintAreaGuide => draw_guide(pixmap, object.size, ts),
        ObjectKind::Overlay(OverlayContent::LinearGradient { from, to }) => {
            draw_gradient(pixmap, object.size, *from, *to, ts, object.opacity, object.blend_mode);
        }
        ObjectKind::Overlay(OverlayContent::Texture(texture)) => {
            let tile: &Pixmap = texture;
            let sx = object.size.width as f32 / tile.width() as f32;
            let sy = object.size.height as f32 / tile.height() as f32;
            let paint = PixmapPaint {
                opacity: object.opacity,
                blend_mode: object.blend_mode,
                quality: FilterQuality::Nearest,
            };
            pixmap.draw_pixmap(0, 0, tile.as_ref(), &paint, ts.pre_scale(sx, sy), None);
        }
    }
}

fn draw_vector(
    pixmap: &mut Pixmap,
    graphic: &VectorGraphic,
    ts: Transform,
    opacity: f32,
    blend_mode: BlendMode,
) {
    for shape in graphic.shapes() {
        let shape_ts = ts.pre_concat(shape.transform);
        if let Some(fill) = shape.fill {
            let mut paint = solid_paint(fill, opacity);
            paint.blend_mode = blend_mode;
            pixmap.fill_path(&shape.path, &paint, shape.fill_rule, shape_ts, None);
        }
        if let Some(stroke) = &shape.stroke {
            let mut paint = solid_paint(stroke.color, opacity);
            paint.blend_mode = blend_mode;
            let st = Stroke {
                width: stroke.width,
                ..Default::default()
            };
            pixmap.stroke_path(&shape.path, &paint, &st, shape_ts, None);
        }
    }
}

/// Fills the graphic's silhouette in the shadow colour on a separate layer,
/// blurs it, and composites it beneath whatever is drawn next.
fn draw_shadow(
    pixmap: &mut Pixmap,
    graphic: &VectorGraphic,
    shadow: &Shadow,
    local: Transform,
    view: Transform,
) {
    let Some(mut layer) = Pixmap::new(pixmap.width(), pixmap.height()) else {
        return;
    };

    let ts = view
        .pre_translate(shadow.offset_x as f32, shadow.offset_y as f32)
        .pre_concat(local);
    let mut paint = solid_paint(shadow.color, 1.0);
    // Overlapping shapes must not darken the silhouette.
    paint.blend_mode = BlendMode::Source;
    for shape in graphic.shapes().iter().filter(|s| s.is_fillable()) {
        layer.fill_path(
            &shape.path,
            &paint,
            shape.fill_rule,
            ts.pre_concat(shape.transform),
            None,
        );
    }

    let sigma = (shadow.blur / 2.0) as f32 * view_scale(&view);
    let layer = blur_pixmap(layer, sigma);
    pixmap.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

fn blur_pixmap(layer: Pixmap, sigma: f32) -> Pixmap {
    if sigma <= 0.0 {
        return layer;
    }
    let (width, height) = (layer.width(), layer.height());
    let Some(buffer) = RgbaImage::from_raw(width, height, layer.data().to_vec()) else {
        return layer;
    };

    let mut data = image::imageops::fast_blur(&buffer, sigma).into_raw();
    // Keep the premultiplied invariant (colour <= alpha) after rounding.
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = px[0].min(a);
        px[1] = px[1].min(a);
        px[2] = px[2].min(a);
    }

    match IntSize::from_wh(width, height).and_then(|size| Pixmap::from_vec(data, size)) {
        Some(blurred) => blurred,
        None => layer,
    }
}

fn draw_raster(
    pixmap: &mut Pixmap,
    raster: &RasterImage,
    ts: Transform,
    opacity: f32,
    blend_mode: BlendMode,
) {
    let paint = PixmapPaint {
        opacity,
        blend_mode,
        quality: FilterQuality::Bilinear,
    };
    pixmap.draw_pixmap(0, 0, raster.pixmap().as_ref(), &paint, ts, None);
}

fn draw_guide(pixmap: &mut Pixmap, size: Size, ts: Transform) {
    let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, size.width as f32, size.height as f32)
    else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    pixmap.fill_path(&path, &solid_paint(GUIDE_FILL, 1.0), FillRule::Winding, ts, None);

    let stroke = Stroke {
        width: 1.0,
        dash: StrokeDash::new(vec![6.0, 6.0], 0.0),
        ..Default::default()
    };
    pixmap.stroke_path(&path, &solid_paint(GUIDE_STROKE, 1.0), &stroke, ts, None);
}

fn draw_gradient(
    pixmap: &mut Pixmap,
    size: Size,
    from: Rgba,
    to: Rgba,
    ts: Transform,
    opacity: f32,
    blend_mode: BlendMode,
) {
    let (w, h) = (size.width as f32, size.height as f32);
    let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, w, h) else {
        return;
    };
    let Some(shader) = LinearGradient::new(
        tiny_skia::Point::from_xy(0.0, 0.0),
        tiny_skia::Point::from_xy(0.0, h),
        vec![
            GradientStop::new(0.0, to_color(from, opacity)),
            GradientStop::new(1.0, to_color(to, opacity)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    ) else {
        return;
    };

    let mut paint = Paint::default();
    paint.shader = shader;
    paint.blend_mode = blend_mode;
    pixmap.fill_rect(rect, &paint, ts, None);
}

/// Outline of the object's rotated box plus corner handles, in pixel space.
fn draw_selection(pixmap: &mut Pixmap, object: &SceneObject, view: Transform) {
    let ts = view.pre_concat(object_transform(object));
    let (w, h) = (object.size.width as f32, object.size.height as f32);
    let mut corners = [
        tiny_skia::Point::from_xy(0.0, 0.0),
        tiny_skia::Point::from_xy(w, 0.0),
        tiny_skia::Point::from_xy(w, h),
        tiny_skia::Point::from_xy(0.0, h),
    ];
    ts.map_points(&mut corners);

    let mut pb = PathBuilder::new();
    pb.move_to(corners[0].x, corners[0].y);
    for c in &corners[1..] {
        pb.line_to(c.x, c.y);
    }
    pb.close();
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: 1.0,
            ..Default::default()
        };
        pixmap.stroke_path(
            &path,
            &solid_paint(SELECTION_BORDER, 1.0),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    let paint = solid_paint(SELECTION_HANDLE, 1.0);
    for c in &corners {
        if let Some(r) = tiny_skia::Rect::from_xywh(
            c.x - HANDLE_SIZE / 2.0,
            c.y - HANDLE_SIZE / 2.0,
            HANDLE_SIZE,
            HANDLE_SIZE,
        ) {
            pixmap.fill_rect(r, &paint, Transform::identity(), None);
        }
    }
}

fn view_scale(view: &Transform) -> f32 {
    (view.sx * view.sx + view.ky * view.ky).sqrt()
}

fn to_color(c: Rgba, opacity: f32) -> Color {
    let a = (c.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::from_rgba8(c.r, c.g, c.b, a)
}

fn solid_paint(c: Rgba, opacity: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_color(c, opacity));
    paint.anti_alias = true;
    paint
}

/// Encodes a premultiplied raster as PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| RenderError::Encode {
            reason: e.to_string(),
        })?;
    Ok(bytes)
}
