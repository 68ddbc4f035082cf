//! Distance graph page.

use std::fmt::Write;

use log::debug;
use svg::{Document, node::element as svg_element};

use super::{Palette, escape_html};
use crate::{SpeciesRingError, layout::GraphLayout};

const EDGE_COLOR: &str = "#666";
const NODE_RADIUS: f32 = 8.0;
const LABEL_OFFSET: f32 = 12.0;

/// Renders a positioned distance graph as a standalone HTML page.
///
/// Edges are drawn first so that nodes and labels sit on top of them. The
/// distances are also listed below the drawing.
///
/// # Errors
///
/// Returns [`SpeciesRingError::Export`] if the page cannot be assembled.
pub fn render_html(layout: &GraphLayout, palette: &Palette) -> Result<String, SpeciesRingError> {
    let canvas = layout.canvas();
    let mut document = Document::new()
        .set("width", canvas.width())
        .set("height", canvas.height())
        .set(
            "viewBox",
            format!("0 0 {} {}", canvas.width(), canvas.height()),
        );

    document = document.add(
        svg_element::Rectangle::new()
            .set("width", canvas.width())
            .set("height", canvas.height())
            .set("fill", palette.background()),
    );

    let mut edges = svg_element::Group::new().set("class", "edges");
    for edge in layout.edges() {
        let Some((source, target)) = layout.endpoints(*edge) else {
            continue;
        };
        let line = svg_element::Line::new()
            .set("class", "edge")
            .set("x1", source.position().x())
            .set("y1", source.position().y())
            .set("x2", target.position().x())
            .set("y2", target.position().y())
            .set("stroke", EDGE_COLOR)
            .set("data-distance", edge.distance().to_string());
        edges = edges.add(line);
    }

    let mut nodes = svg_element::Group::new().set("class", "nodes");
    for node in layout.nodes() {
        let position = node.position();
        nodes = nodes
            .add(
                svg_element::Circle::new()
                    .set("class", "node")
                    .set("cx", position.x())
                    .set("cy", position.y())
                    .set("r", NODE_RADIUS)
                    .set("fill", palette.node()),
            )
            .add(
                svg_element::Text::new(node.name())
                    .set("x", position.x())
                    .set("y", position.y() - LABEL_OFFSET)
                    .set("text-anchor", "middle")
                    .set("font-size", 12),
            );
    }

    document = document.add(edges).add(nodes);

    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\" />")?;
    writeln!(html, "<title>Distance graph</title>")?;
    writeln!(html, "<style>")?;
    writeln!(html, "  body {{ font-family: system-ui, sans-serif; }}")?;
    writeln!(html, "  .edge {{ stroke-width: 1.5; }}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(html, "{document}")?;
    writeln!(html, "<ul class=\"distances\">")?;
    for edge in layout.edges() {
        if let Some((source, target)) = layout.endpoints(*edge) {
            writeln!(
                html,
                "<li>{} &ndash; {}: {}</li>",
                escape_html(source.name()),
                escape_html(target.name()),
                edge.distance()
            )?;
        }
    }
    writeln!(html, "</ul>")?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;

    debug!(
        nodes = layout.nodes().len(),
        edges = layout.edges().len();
        "Distance graph rendered"
    );
    Ok(html)
}
