// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG markup for single drawables.

use std::fmt::Write as _;

use kurbo::{BezPath, PathEl, Point, Vec2};
use tessera_core::scene::{Paint, Primitive};

/// Start-tag contents of one drawable: the element name and its attributes.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Element {
    pub(crate) tag: &'static str,
    pub(crate) attrs: String,
}

impl Element {
    /// Builds the element for a drawable placed at `offset` within its parent.
    pub(crate) fn new(primitive: &Primitive, paint: &Paint, offset: Vec2) -> Self {
        let mut attrs = String::new();
        if offset != Vec2::ZERO {
            let _ = write!(attrs, " transform=\"translate({} {})\"", offset.x, offset.y);
        }
        let tag = match primitive {
            Primitive::Group => {
                write_class(&mut attrs, paint);
                "g"
            }
            Primitive::Path(path) => {
                attrs.push_str(" d=\"");
                write_path_data(&mut attrs, path);
                attrs.push('"');
                write_paint(&mut attrs, paint);
                "path"
            }
            Primitive::Circle(circle) => {
                let _ = write!(
                    attrs,
                    " cx=\"{}\" cy=\"{}\" r=\"{}\"",
                    circle.center.x, circle.center.y, circle.radius
                );
                write_paint(&mut attrs, paint);
                "circle"
            }
            Primitive::Image(image) => {
                let _ = write!(
                    attrs,
                    " x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" href=\"",
                    image.rect.x0,
                    image.rect.y0,
                    image.rect.width(),
                    image.rect.height()
                );
                escape_into(&mut attrs, &image.href);
                attrs.push('"');
                if paint.opacity != 1.0 {
                    let _ = write!(attrs, " opacity=\"{}\"", paint.opacity);
                }
                write_class(&mut attrs, paint);
                write_pointer_events(&mut attrs, paint);
                "image"
            }
        };
        Self { tag, attrs }
    }

    /// Whether the element wraps child drawables.
    pub(crate) fn is_container(&self) -> bool {
        self.tag == "g"
    }

    pub(crate) fn write_open(&self, out: &mut String) {
        let _ = write!(out, "<{}{}", self.tag, self.attrs);
        out.push_str(if self.is_container() { ">" } else { "/>" });
    }

    pub(crate) fn write_close(&self, out: &mut String) {
        if self.is_container() {
            let _ = write!(out, "</{}>", self.tag);
        }
    }
}

/// SVG path data for `path`: `M x y L x y … Z`, with quadratic and cubic
/// segments as `Q` and `C`.
#[must_use]
pub fn path_data(path: &BezPath) -> String {
    let mut out = String::new();
    write_path_data(&mut out, path);
    out
}

fn write_path_data(out: &mut String, path: &BezPath) {
    let mut first = true;
    for el in path.elements() {
        if !first {
            out.push(' ');
        }
        first = false;
        match *el {
            PathEl::MoveTo(p) => write_cmd(out, 'M', &[p]),
            PathEl::LineTo(p) => write_cmd(out, 'L', &[p]),
            PathEl::QuadTo(p1, p2) => write_cmd(out, 'Q', &[p1, p2]),
            PathEl::CurveTo(p1, p2, p3) => write_cmd(out, 'C', &[p1, p2, p3]),
            PathEl::ClosePath => out.push('Z'),
        }
    }
}

fn write_cmd(out: &mut String, cmd: char, points: &[Point]) {
    out.push(cmd);
    for p in points {
        let _ = write!(out, " {} {}", p.x, p.y);
    }
}

fn write_paint(out: &mut String, paint: &Paint) {
    match &paint.stroke {
        Some(stroke) => {
            out.push_str(" stroke=\"");
            escape_into(out, &stroke.color);
            let _ = write!(
                out,
                "\" stroke-opacity=\"{}\" stroke-width=\"{}\" stroke-linecap=\"{}\" stroke-linejoin=\"{}\"",
                stroke.opacity,
                stroke.width,
                stroke.cap.as_str(),
                stroke.join.as_str()
            );
            if let Some(dashes) = &stroke.dash_array {
                out.push_str(" stroke-dasharray=\"");
                escape_into(out, dashes);
                out.push('"');
            }
            if let Some(offset) = stroke.dash_offset {
                let _ = write!(out, " stroke-dashoffset=\"{offset}\"");
            }
        }
        None => out.push_str(" stroke=\"none\""),
    }
    match &paint.fill {
        Some(fill) => {
            out.push_str(" fill=\"");
            escape_into(out, &fill.color);
            let _ = write!(
                out,
                "\" fill-opacity=\"{}\" fill-rule=\"{}\"",
                fill.opacity,
                fill.rule.as_str()
            );
        }
        None => out.push_str(" fill=\"none\""),
    }
    write_class(out, paint);
    write_pointer_events(out, paint);
}

fn write_class(out: &mut String, paint: &Paint) {
    if let Some(class) = &paint.class_name {
        out.push_str(" class=\"");
        escape_into(out, class);
        out.push('"');
    }
}

// Groups never get this: `pointer-events` inherits, and would switch off
// interactive children.
fn write_pointer_events(out: &mut String, paint: &Paint) {
    if !paint.interactive {
        out.push_str(" pointer-events=\"none\"");
    }
}

/// Appends `s` with XML attribute metacharacters escaped.
fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Circle, Rect};
    use tessera_core::scene::{Fill, FillRule, ImagePrimitive, LineCap, LineJoin, Stroke};

    use super::*;

    fn open(primitive: &Primitive, paint: &Paint) -> String {
        let mut out = String::new();
        Element::new(primitive, paint, Vec2::ZERO).write_open(&mut out);
        out
    }

    fn stroked() -> Paint {
        Paint {
            stroke: Some(Stroke {
                color: "#3388ff".into(),
                opacity: 1.0,
                width: 3.0,
                cap: LineCap::Round,
                join: LineJoin::Round,
                dash_array: Some("4 2".into()),
                dash_offset: Some(1.5),
            }),
            fill: None,
            opacity: 1.0,
            class_name: None,
            interactive: true,
        }
    }

    #[test]
    fn path_data_uses_absolute_commands() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.quad_to((10.0, 5.0), (5.0, 5.0));
        path.curve_to((4.0, 5.0), (1.0, 2.0), (0.5, 0.25));
        path.close_path();
        assert_eq!(
            path_data(&path),
            "M 0 0 L 10 0 Q 10 5 5 5 C 4 5 1 2 0.5 0.25 Z"
        );
    }

    #[test]
    fn stroked_path_attributes() {
        let mut path = BezPath::new();
        path.move_to((1.0, 2.0));
        path.line_to((3.0, 4.0));
        assert_eq!(
            open(&Primitive::Path(path), &stroked()),
            "<path d=\"M 1 2 L 3 4\" stroke=\"#3388ff\" stroke-opacity=\"1\" stroke-width=\"3\" \
             stroke-linecap=\"round\" stroke-linejoin=\"round\" stroke-dasharray=\"4 2\" \
             stroke-dashoffset=\"1.5\" fill=\"none\"/>"
        );
    }

    #[test]
    fn filled_circle_attributes() {
        let paint = Paint {
            stroke: None,
            fill: Some(Fill {
                color: "red".into(),
                opacity: 0.2,
                rule: FillRule::EvenOdd,
            }),
            opacity: 1.0,
            class_name: Some("poi".into()),
            interactive: false,
        };
        assert_eq!(
            open(&Primitive::Circle(Circle::new((5.0, 6.0), 10.0)), &paint),
            "<circle cx=\"5\" cy=\"6\" r=\"10\" stroke=\"none\" fill=\"red\" fill-opacity=\"0.2\" \
             fill-rule=\"evenodd\" class=\"poi\" pointer-events=\"none\"/>"
        );
    }

    #[test]
    fn image_attributes_escape_href() {
        let image = ImagePrimitive {
            rect: Rect::new(92.0, 26.0, 108.0, 50.0),
            href: "pin.png?a=1&b=\"2\"".into(),
        };
        let paint = Paint {
            opacity: 0.5,
            interactive: true,
            ..Paint::NONE
        };
        assert_eq!(
            open(&Primitive::Image(image), &paint),
            "<image x=\"92\" y=\"26\" width=\"16\" height=\"24\" \
             href=\"pin.png?a=1&amp;b=&quot;2&quot;\" opacity=\"0.5\"/>"
        );
    }

    #[test]
    fn groups_wrap_children_without_pointer_events() {
        let element = Element::new(&Primitive::Group, &Paint::NONE, Vec2::ZERO);
        let mut out = String::new();
        element.write_open(&mut out);
        element.write_close(&mut out);
        assert_eq!(out, "<g></g>");
    }

    #[test]
    fn offset_becomes_translate() {
        let element = Element::new(&Primitive::Group, &Paint::NONE, Vec2::new(256.0, -128.5));
        let mut out = String::new();
        element.write_open(&mut out);
        assert_eq!(out, "<g transform=\"translate(256 -128.5)\">");
    }
}
