// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders a nested stacked column chart to SVG.
//!
//! The input is a JSON document `{ "response": .., "rows": [..], "config": {..} }`. Without
//! an input path a built-in sample is used.

mod logging;
mod svg;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use kurbo::{Point, Size};
use nestcol_charts::{ChartConfig, ChartOutput, ChartRenderer, NestedColumnChart};
use nestcol_core::{QueryResponse, Row};
use serde::Deserialize;

const SAMPLE: &str = include_str!("../data/sample.json");

#[derive(Parser, Debug)]
#[command(name = "nestcol_demo")]
#[command(about = "Render a nested stacked column chart from a query result", long_about = None)]
struct Args {
    /// Query-result document; the built-in sample when omitted.
    input: Option<PathBuf>,

    /// Where to write the SVG; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 640.0)]
    width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 400.0)]
    height: f64,

    /// Print the tooltip at a view-space point, e.g. `--probe 120,200`.
    #[arg(long, value_parser = parse_point)]
    probe: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct Document {
    response: QueryResponse,
    #[serde(default)]
    rows: Vec<Row>,
    #[serde(default)]
    config: ChartConfig,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {s:?}"))?;
    let coord = |c: &str| c.trim().parse::<f64>().map_err(|e| format!("{c:?}: {e}"));
    Ok(Point::new(coord(x)?, coord(y)?))
}

fn load(input: Option<&PathBuf>) -> Result<Document> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            log::info!("no input given; rendering the built-in sample");
            SAMPLE.to_owned()
        }
    };
    serde_json::from_str(&text).context("Failed to parse query-result document")
}

fn build(doc: &Document, viewport: Size) -> Result<ChartOutput> {
    let chart = NestedColumnChart::new(doc.config.clone());
    match chart.build(&doc.response, &doc.rows, viewport) {
        Ok(output) => Ok(output),
        Err(e) if e.is_user_facing() => bail!("{e}"),
        Err(e) => Err(e).context("chart engine failed"),
    }
}

fn print_tooltip(output: &ChartOutput, at: Point) {
    match output.tooltip(at) {
        Some(t) => {
            eprintln!(
                "({}, {}): {} / {}: {} = {}",
                at.x, at.y, t.dimension_value, t.measure_label, t.pivot_label, t.value
            );
            for link in &t.links {
                eprintln!("    {} -> {}", link.label, link.url);
            }
        }
        None => eprintln!("({}, {}): nothing here", at.x, at.y),
    }
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let doc = load(args.input.as_ref())?;
    let output = build(&doc, Size::new(args.width, args.height))?;
    log::info!(
        "{} segments, {} legend entries",
        output.rectangles.len(),
        output.legend.len()
    );
    for &at in &args.probe {
        print_tooltip(&output, at);
    }

    let mut renderer = svg::SvgRenderer::default();
    renderer
        .render(&output)
        .context("Failed to render SVG")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, renderer.document())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let mut handle = io::stdout().lock();
            handle
                .write_all(renderer.document().as_bytes())
                .context("Failed to write SVG to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse_from_comma_pairs() {
        assert_eq!(parse_point("12, 3.5"), Ok(Point::new(12.0, 3.5)));
        assert!(parse_point("12").is_err(), "missing y");
        assert!(parse_point("a,1").is_err(), "bad x");
    }

    #[test]
    fn sample_renders_every_segment_and_legend_entry() {
        let doc = load(None).unwrap();
        let output = build(&doc, Size::new(640.0, 400.0)).unwrap();
        // 3 months x 2 measures x 3 channels; the row total column is not a pivot key.
        assert_eq!(output.rectangles.len(), 18);
        assert_eq!(output.legend.len(), 3);
        assert_eq!(output.x_axis.ticks[0].label, "Jan 2024");

        let mut renderer = svg::SvgRenderer::default();
        renderer.render(&output).unwrap();
        let svg = renderer.document();
        assert!(svg.starts_with("<svg"), "{svg}");
        assert!(svg.contains("Jan 2024 / Revenue: Web = 12400"), "{svg}");
        assert!(svg.contains(">Partner</text>"), "{svg}");
        assert!(svg.contains(">USD</text>"), "{svg}");
        // Feb partner revenue is null: a zero-height segment is laid out but not drawn.
        assert_eq!(svg.matches("<title>").count(), 17);
    }

    #[test]
    fn schema_errors_surface_as_messages() {
        let mut doc = load(None).unwrap();
        doc.response.fields.pivots.clear();
        let err = build(&doc, Size::new(640.0, 400.0)).unwrap_err();
        assert!(err.to_string().contains("pivots"), "{err}");
    }
}
