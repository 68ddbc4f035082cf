//! Concentric ring report.
//!
//! Renders a [`RadialLayout`] of comparison rows as an inline SVG: one dashed
//! guide circle per ring, the reference species at the centre and every other
//! species at its ring position, followed by a table of sequences with the
//! residues that differ from the reference colourised.

use std::fmt::Write;

use log::debug;
use svg::{
    Document,
    node::element::{self as svg_element, ClipPath, Definitions},
};

use speciesring_core::{alignment::Mask, geometry::Point, radial::RadialLayout};
use speciesring_source::store::SpeciesReportRow;

use super::{Palette, escape_html};
use crate::SpeciesRingError;

const GUIDE_COLOR: &str = "#dee2e6";
const MARKER_RADIUS: f32 = 4.0;
const IMAGE_SIZE: f32 = 48.0;

/// Renders the concentric report page.
///
/// `rows` fills the sequence table in the given order; callers pass them
/// sorted by distance.
///
/// # Errors
///
/// Returns [`SpeciesRingError::Core`] if a row carries an unreadable
/// difference mask, and [`SpeciesRingError::Export`] if the page cannot be
/// assembled.
pub fn render_html(
    gene: &str,
    layout: &RadialLayout<'_, SpeciesReportRow>,
    rows: &[SpeciesReportRow],
    palette: &Palette,
) -> Result<String, SpeciesRingError> {
    let center = layout.center().entity();
    let reference = escape_html(center.name());
    let gene = escape_html(gene);
    let document = render_svg(layout, palette);

    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\" />")?;
    writeln!(
        html,
        "<title>{gene} similarity to {reference}: concentric view</title>"
    )?;
    writeln!(html, "<style>")?;
    writeln!(
        html,
        "  body {{ font-family: system-ui, sans-serif; padding: 2rem; text-align: center; }}"
    )?;
    writeln!(html, "  #radar svg {{ border: 2px solid {GUIDE_COLOR}; border-radius: 50%; }}")?;
    writeln!(html, "  .legend {{ color: #6c757d; }}")?;
    writeln!(
        html,
        "  table {{ margin: 2rem auto; border-collapse: collapse; text-align: left; }}"
    )?;
    writeln!(
        html,
        "  td, th {{ padding: .25rem .75rem; border-bottom: 1px solid {GUIDE_COLOR}; }}"
    )?;
    writeln!(html, "  td.sequence {{ font-family: monospace; word-break: break-all; }}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(
        html,
        "<h2>{gene} similarity to {reference} (edit distance)</h2>"
    )?;
    writeln!(html, "<div id=\"radar\">")?;
    writeln!(html, "{document}")?;
    writeln!(html, "</div>")?;
    writeln!(
        html,
        "<p class=\"legend\">Ring spacing&nbsp;=&nbsp;{}px &nbsp;|&nbsp; 0&nbsp;=&nbsp;{reference}</p>",
        layout.ring_spacing()
    )?;

    write_sequence_table(&mut html, rows, palette)?;

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;

    debug!(
        rings = layout.ring_count(),
        species = layout.assignments().len() + 1;
        "Concentric report rendered"
    );
    Ok(html)
}

fn render_svg(layout: &RadialLayout<'_, SpeciesReportRow>, palette: &Palette) -> Document {
    let canvas = layout.canvas();
    let center = layout.center();
    let center_point = center.position();

    let mut definitions = Definitions::new();
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

    for radius in layout.ring_radii() {
        document = document.add(
            svg_element::Circle::new()
                .set("cx", center_point.x())
                .set("cy", center_point.y())
                .set("r", radius)
                .set("fill", "none")
                .set("stroke", GUIDE_COLOR)
                .set("stroke-dasharray", "4 4"),
        );
    }

    let mut species = svg_element::Group::new().set("id", "species");

    let (center_group, center_clip) = species_marker(
        center.entity(),
        center.distance(),
        center_point,
        "center",
        true,
        palette,
    );
    species = species.add(center_group);
    if let Some(clip) = center_clip {
        definitions = definitions.add(clip);
    }

    for (idx, assignment) in layout.assignments().iter().enumerate() {
        let (group, clip) = species_marker(
            assignment.entity(),
            assignment.distance(),
            assignment.position(),
            &format!("ring-{}-{idx}", assignment.ring()),
            false,
            palette,
        );
        species = species.add(group);
        if let Some(clip) = clip {
            definitions = definitions.add(clip);
        }
    }

    document.add(definitions).add(species)
}

/// Draws one species: a marker dot, an optional round photo above it and the
/// name and distance below.
fn species_marker(
    row: &SpeciesReportRow,
    distance: usize,
    position: Point,
    id: &str,
    is_center: bool,
    palette: &Palette,
) -> (svg_element::Group, Option<ClipPath>) {
    let mut group = svg_element::Group::new()
        .set("class", if is_center { "species center" } else { "species" });

    group = group.add(
        svg_element::Circle::new()
            .set("cx", position.x())
            .set("cy", position.y())
            .set("r", MARKER_RADIUS)
            .set("fill", palette.node()),
    );

    let mut clip = None;
    if let Some(url) = row.image_url() {
        let clip_id = format!("clip-{id}");
        let image_center = Point::new(position.x(), position.y() - IMAGE_SIZE / 2.0 - 6.0);

        clip = Some(
            ClipPath::new().set("id", clip_id.clone()).add(
                svg_element::Circle::new()
                    .set("cx", image_center.x())
                    .set("cy", image_center.y())
                    .set("r", IMAGE_SIZE / 2.0),
            ),
        );
        group = group.add(
            svg_element::Image::new()
                .set("href", url)
                .set("x", image_center.x() - IMAGE_SIZE / 2.0)
                .set("y", image_center.y() - IMAGE_SIZE / 2.0)
                .set("width", IMAGE_SIZE)
                .set("height", IMAGE_SIZE)
                .set("clip-path", format!("url(#{clip_id})"))
                .set("preserveAspectRatio", "xMidYMid slice"),
        );
    }

    group = group.add(
        svg_element::Text::new(row.name())
            .set("x", position.x())
            .set("y", position.y() + 16.0)
            .set("text-anchor", "middle")
            .set("font-size", 14)
            .set("font-weight", if is_center { "600" } else { "normal" }),
    );
    group = group.add(
        svg_element::Text::new(format!("({distance})"))
            .set("x", position.x())
            .set("y", position.y() + 30.0)
            .set("text-anchor", "middle")
            .set("font-size", 11),
    );

    (group, clip)
}

fn write_sequence_table(
    html: &mut String,
    rows: &[SpeciesReportRow],
    palette: &Palette,
) -> Result<(), SpeciesRingError> {
    let span_style = palette.mismatch().to_css_declaration();

    writeln!(html, "<table>")?;
    writeln!(
        html,
        "<thead><tr><th>Species</th><th>Scientific name</th><th>Distance</th><th>Sequence</th></tr></thead>"
    )?;
    writeln!(html, "<tbody>")?;
    for row in rows {
        let mask: Mask = row.different().parse()?;
        let sequence = mask.highlight_with(
            row.sequence(),
            |c| escape_html(c.encode_utf8(&mut [0; 4])),
            |c| {
                format!(
                    "<span style=\"{span_style}\">{}</span>",
                    escape_html(c.encode_utf8(&mut [0; 4]))
                )
            },
        );
        writeln!(
            html,
            "<tr><td>{}</td><td><i>{}</i></td><td>{}</td><td class=\"sequence\">{sequence}</td></tr>",
            escape_html(row.name()),
            escape_html(row.scientific_name()),
            row.distance(),
        )?;
    }
    writeln!(html, "</tbody>")?;
    writeln!(html, "</table>")?;
    Ok(())
}
