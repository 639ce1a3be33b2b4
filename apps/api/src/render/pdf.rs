//! PDF serialization of a `PageImage` with lopdf.
//!
//! One A4 page, the four standard Type1 faces, WinAnsi text. A snapshot layer becomes a Form
//! XObject drawn once under a single `cm` transform, which is what keeps structural scaling
//! uniform across every glyph and shape in the body.

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::layout::font_metrics::FontFace;
use crate::layout::geometry::PT_PER_MM;
use crate::render::draw::{Color, DrawCommand, Layer, LayerKind, PageImage, Stroke};
use crate::render::RenderError;

/// Bezier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;
const SNAPSHOT_NAME: &str = "Snap";

#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// Flate-compress content streams.
    pub compress: bool,
    /// Document title in the info dictionary.
    pub title: String,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            compress: true,
            title: "Resume".to_string(),
        }
    }
}

fn backend_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Backend(e.to_string())
}

pub fn write_pdf(image: &PageImage, options: &PdfOptions) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in FontFace::ALL {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), id);
    }
    let form_resources_id = doc.add_object(dictionary! { "Font" => fonts.clone() });

    let mut operations = Vec::new();
    let mut xobjects = Dictionary::new();
    for layer in &image.layers {
        match layer.kind {
            LayerKind::Backdrop | LayerKind::Content => {
                operations.extend(layer_operations(&layer.commands, image.height)?);
            }
            LayerKind::Snapshot => {
                if layer.commands.is_empty() {
                    continue;
                }
                let form_id = add_form(&mut doc, layer, form_resources_id)?;
                xobjects.set(SNAPSHOT_NAME, form_id);
                operations.extend(place_form(layer, image.height));
            }
        }
    }

    let content = Content { operations }.encode().map_err(backend_err)?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => xobjects,
    });
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.set_object(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                (image.width * PT_PER_MM).into(),
                (image.height * PT_PER_MM).into(),
            ],
        },
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let stamp = Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(&options.title)?, StringFormat::Literal),
        "Producer" => Object::string_literal("onepage"),
        "CreationDate" => Object::string_literal(stamp.clone()),
        "ModDate" => Object::string_literal(stamp),
    });
    doc.trailer.set("Info", info_id);

    if options.compress {
        doc.compress();
    }
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(backend_err)?;
    Ok(buffer)
}

/// Records the snapshot as a Form XObject in its own local space.
fn add_form(doc: &mut Document, layer: &Layer, resources: ObjectId) -> Result<ObjectId, RenderError> {
    let content = Content {
        operations: layer_operations(&layer.commands, layer.height)?,
    }
    .encode()
    .map_err(backend_err)?;
    let form = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![
                0.into(),
                0.into(),
                (layer.width * PT_PER_MM).into(),
                (layer.height * PT_PER_MM).into(),
            ],
            "Resources" => resources,
        },
        content,
    );
    Ok(doc.add_object(form))
}

/// `q s 0 0 s tx ty cm /Snap Do Q`, with y flipped against the page height.
fn place_form(layer: &Layer, page_height: f32) -> Vec<Operation> {
    let t = layer.transform;
    let tx = t.dx * PT_PER_MM;
    let ty = (page_height - t.dy - t.scale * layer.height) * PT_PER_MM;
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![t.scale.into(), 0.into(), 0.into(), t.scale.into(), tx.into(), ty.into()],
        ),
        Operation::new("Do", vec![Object::Name(SNAPSHOT_NAME.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Content operators
// ────────────────────────────────────────────────────────────────────────────

/// Converts commands in millimetres (y down from the top of a box `height` tall) to PDF points.
struct Space {
    height: f32,
}

impl Space {
    fn x(&self, x: f32) -> f32 {
        x * PT_PER_MM
    }

    fn y(&self, y: f32) -> f32 {
        (self.height - y) * PT_PER_MM
    }
}

fn color_op(op: &str, color: Color) -> Operation {
    let [r, g, b] = color.unit();
    Operation::new(op, vec![r.into(), g.into(), b.into()])
}

fn stroke_ops(ops: &mut Vec<Operation>, stroke: Stroke) {
    ops.push(color_op("RG", stroke.color));
    ops.push(Operation::new("w", vec![(stroke.width * PT_PER_MM).into()]));
}

fn point(op: &str, x: f32, y: f32) -> Operation {
    Operation::new(op, vec![x.into(), y.into()])
}

fn curve(ops: &mut Vec<Operation>, c1: (f32, f32), c2: (f32, f32), end: (f32, f32)) {
    ops.push(Operation::new(
        "c",
        vec![
            c1.0.into(),
            c1.1.into(),
            c2.0.into(),
            c2.1.into(),
            end.0.into(),
            end.1.into(),
        ],
    ));
}

/// Rounded rectangle path in points, counter-clockwise from the bottom edge.
fn rounded_rect(ops: &mut Vec<Operation>, left: f32, bottom: f32, right: f32, top: f32, r: f32) {
    let k = r * KAPPA;
    ops.push(point("m", left + r, bottom));
    ops.push(point("l", right - r, bottom));
    curve(ops, (right - r + k, bottom), (right, bottom + r - k), (right, bottom + r));
    ops.push(point("l", right, top - r));
    curve(ops, (right, top - r + k), (right - r + k, top), (right - r, top));
    ops.push(point("l", left + r, top));
    curve(ops, (left + r - k, top), (left, top - r + k), (left, top - r));
    ops.push(point("l", left, bottom + r));
    curve(ops, (left, bottom + r - k), (left + r - k, bottom), (left + r, bottom));
    ops.push(Operation::new("h", vec![]));
}

fn circle(ops: &mut Vec<Operation>, cx: f32, cy: f32, r: f32) {
    let k = r * KAPPA;
    ops.push(point("m", cx + r, cy));
    curve(ops, (cx + r, cy + k), (cx + k, cy + r), (cx, cy + r));
    curve(ops, (cx - k, cy + r), (cx - r, cy + k), (cx - r, cy));
    curve(ops, (cx - r, cy - k), (cx - k, cy - r), (cx, cy - r));
    curve(ops, (cx + k, cy - r), (cx + r, cy - k), (cx + r, cy));
    ops.push(Operation::new("h", vec![]));
}

fn layer_operations(commands: &[DrawCommand], height: f32) -> Result<Vec<Operation>, RenderError> {
    let space = Space { height };
    let mut ops = Vec::new();
    for command in commands {
        match command {
            DrawCommand::Text { x, y, text, style } => {
                let bytes = encode_win_ansi(text)?;
                let baseline = space.y(y + style.baseline_offset());
                ops.push(Operation::new("BT", vec![]));
                ops.push(color_op("rg", style.color));
                ops.push(Operation::new(
                    "Tf",
                    vec![style.face.resource_name().into(), style.size.into()],
                ));
                ops.push(Operation::new(
                    "Tm",
                    vec![
                        1.into(),
                        0.into(),
                        0.into(),
                        1.into(),
                        space.x(*x).into(),
                        baseline.into(),
                    ],
                ));
                ops.push(Operation::new("Tj", vec![Object::String(bytes, StringFormat::Literal)]));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawCommand::Line { x1, y1, x2, y2, stroke } => {
                ops.push(Operation::new("q", vec![]));
                stroke_ops(&mut ops, *stroke);
                ops.push(point("m", space.x(*x1), space.y(*y1)));
                ops.push(point("l", space.x(*x2), space.y(*y2)));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                radius,
                fill,
                stroke,
            } => {
                if fill.is_none() && stroke.is_none() {
                    continue;
                }
                ops.push(Operation::new("q", vec![]));
                if let Some(fill) = fill {
                    ops.push(color_op("rg", *fill));
                }
                if let Some(stroke) = stroke {
                    stroke_ops(&mut ops, *stroke);
                }
                let (left, right) = (space.x(*x), space.x(x + width));
                let (top, bottom) = (space.y(*y), space.y(y + height));
                let r = (radius * PT_PER_MM).min((right - left) / 2.0).min((top - bottom) / 2.0);
                if r > 0.0 {
                    rounded_rect(&mut ops, left, bottom, right, top, r);
                } else {
                    ops.push(Operation::new(
                        "re",
                        vec![left.into(), bottom.into(), (right - left).into(), (top - bottom).into()],
                    ));
                }
                let paint = match (fill.is_some(), stroke.is_some()) {
                    (true, true) => "B",
                    (true, false) => "f",
                    _ => "S",
                };
                ops.push(Operation::new(paint, vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawCommand::Circle { cx, cy, r, fill } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(color_op("rg", *fill));
                circle(&mut ops, space.x(*cx), space.y(*cy), r * PT_PER_MM);
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    Ok(ops)
}

// ────────────────────────────────────────────────────────────────────────────
// Text encoding
// ────────────────────────────────────────────────────────────────────────────

/// WinAnsi code for the characters outside Latin-1 that the encoding carries.
fn win_ansi_extra(c: char) -> Option<u8> {
    Some(match c {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    })
}

/// Encodes text for the standard fonts. Characters WinAnsi cannot carry are an error.
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>, RenderError> {
    text.chars()
        .map(|c| match c {
            '\t' => Ok(b' '),
            ' '..='~' => Ok(c as u8),
            '\u{00A0}'..='\u{00FF}' => Ok(c as u32 as u8),
            _ => win_ansi_extra(c).ok_or_else(|| {
                RenderError::Backend(format!(
                    "character {c:?} (U+{:04X}) cannot be encoded for the standard PDF fonts",
                    c as u32
                ))
            }),
        })
        .collect()
}
