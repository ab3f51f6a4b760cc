// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG output for `nestcol_demo`.

use std::fmt::{self, Write};

use kurbo::{Rect, Vec2};
use nestcol_charts::{Axis, AxisOrient, ChartOutput, ChartRenderer, LegendEntry, Rectangle};
use peniko::Color;
use peniko::color::palette::css;

const TICK_LEN: f64 = 5.0;
const SWATCH: f64 = 10.0;

#[derive(Clone, Copy, Debug)]
enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Renders a chart into an SVG document held in memory.
///
/// Each `render` call replaces the previous document; on error the last good one is kept.
#[derive(Debug, Default)]
pub(crate) struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    pub(crate) fn document(&self) -> &str {
        &self.document
    }
}

impl ChartRenderer for SvgRenderer {
    type Error = fmt::Error;

    fn render(&mut self, output: &ChartOutput) -> Result<(), Self::Error> {
        let mut out = String::new();
        let view = output.layout.view;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
            view.x0,
            view.y0,
            view.width(),
            view.height(),
            view.width(),
            view.height()
        )?;

        let origin = output.layout.plot.origin().to_vec2();
        out.push_str("<g class=\"bars\">\n");
        for r in output.rectangles.iter().filter(|r| !r.is_empty()) {
            write_rect(&mut out, r.rect() + origin, r.fill)?;
            // Native tooltip.
            writeln!(
                out,
                "<title>{} / {}: {} = {}</title></rect>",
                escape_xml(&r.dimension_value),
                escape_xml(measure_label(output, r)),
                escape_xml(&r.pivot_label),
                r.value()
            )?;
        }
        out.push_str("</g>\n");

        write_axis(&mut out, &output.x_axis, output.layout.plot)?;
        write_axis(&mut out, &output.y_axis, output.layout.plot)?;
        write_legend(
            &mut out,
            &output.legend,
            output.layout.plot,
            output.x_axis.font_size,
        )?;

        out.push_str("</svg>\n");
        self.document = out;
        Ok(())
    }
}

fn measure_label<'a>(output: &'a ChartOutput, r: &'a Rectangle) -> &'a str {
    output
        .fields
        .measure(&r.measure_name)
        .map_or(r.measure_name.as_str(), |m| m.display_label())
}

/// Opens a `<rect>` element; the caller closes it.
fn write_rect(out: &mut String, rect: Rect, fill: Color) -> fmt::Result {
    write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        rect.x0,
        rect.y0,
        rect.width(),
        rect.height()
    )?;
    write_paint_attr(out, "fill", fill)?;
    out.push('>');
    Ok(())
}

fn write_axis(out: &mut String, axis: &Axis, plot: Rect) -> fmt::Result {
    let stroke = svg_paint(css::DIM_GRAY).0;
    let fs = axis.font_size;
    out.push_str("<g class=\"axis\">\n");
    match axis.orient {
        AxisOrient::Bottom => {
            let y = plot.y1;
            writeln!(
                out,
                r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{stroke}"/>"#,
                plot.x0, plot.x1
            )?;
            for tick in &axis.ticks {
                let x = plot.x0 + tick.position;
                writeln!(
                    out,
                    r#"<line x1="{x}" y1="{y}" x2="{x}" y2="{}" stroke="{stroke}"/>"#,
                    y + TICK_LEN
                )?;
                let at = Vec2::new(x, y + TICK_LEN + fs);
                write_text(out, at, fs, TextAnchor::Middle, &tick.label)?;
            }
            let title_at = Vec2::new(plot.center().x, y + TICK_LEN + 2.5 * fs);
            write_text(out, title_at, fs, TextAnchor::Middle, &axis.title)?;
        }
        AxisOrient::Left => {
            let x = plot.x0;
            writeln!(
                out,
                r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{stroke}"/>"#,
                plot.y0, plot.y1
            )?;
            for tick in &axis.ticks {
                let y = plot.y0 + tick.position;
                writeln!(
                    out,
                    r#"<line x1="{}" y1="{y}" x2="{x}" y2="{y}" stroke="{stroke}"/>"#,
                    x - TICK_LEN
                )?;
                let at = Vec2::new(x - TICK_LEN - 2.0, y + 0.35 * fs);
                write_text(out, at, fs, TextAnchor::End, &tick.label)?;
            }
            write_text(
                out,
                Vec2::new(x, plot.y0 - 0.5 * fs),
                fs,
                TextAnchor::Middle,
                &axis.title,
            )?;
        }
    }
    out.push_str("</g>\n");
    Ok(())
}

/// Legend swatches in one row under the dimension axis.
fn write_legend(
    out: &mut String,
    entries: &[LegendEntry],
    plot: Rect,
    font_size: f64,
) -> fmt::Result {
    out.push_str("<g class=\"legend\">\n");
    let y = plot.y1 + TICK_LEN + 3.5 * font_size;
    let mut x = plot.x0;
    for entry in entries {
        write_rect(out, Rect::new(x, y, x + SWATCH, y + SWATCH), entry.color)?;
        out.push_str("</rect>\n");
        let label_at = Vec2::new(x + SWATCH + 4.0, y + SWATCH - 1.0);
        write_text(out, label_at, font_size, TextAnchor::Start, &entry.label)?;
        x += SWATCH + 4.0 + estimate_text_width(&entry.label, font_size) + 12.0;
    }
    out.push_str("</g>\n");
    Ok(())
}

fn write_text(
    out: &mut String,
    at: Vec2,
    font_size: f64,
    anchor: TextAnchor,
    text: &str,
) -> fmt::Result {
    let anchor = match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    write!(
        out,
        r#"<text x="{}" y="{}" font-size="{font_size}" text-anchor="{anchor}""#,
        at.x, at.y
    )?;
    write_paint_attr(out, "fill", css::BLACK)?;
    writeln!(out, ">{}</text>", escape_xml(text))
}

/// Rough width at ~0.6em per glyph.
fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    0.6 * font_size * text.chars().count() as f64
}

fn svg_paint(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (fill, opacity)
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) -> fmt::Result {
    let (value, opacity) = svg_paint(color);
    write!(out, r#" {name}="{value}""#)?;
    if let Some(o) = opacity {
        write!(out, r#" {name}-opacity="{o}""#)?;
    }
    Ok(())
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_specials_are_escaped() {
        assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn opaque_colors_have_no_opacity_attribute() {
        let mut out = String::new();
        write_paint_attr(&mut out, "fill", css::CRIMSON).unwrap();
        assert_eq!(out, r##" fill="#dc143c""##);
        out.clear();
        write_paint_attr(&mut out, "fill", css::CRIMSON.with_alpha(0.5)).unwrap();
        assert!(out.contains("fill-opacity"), "{out}");
    }
}
