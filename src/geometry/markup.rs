//! Native page geometry from page-file header markup.
//!
//! Two declarations are understood:
//! - the root `<svg>` element's `viewBox`, or its `width`/`height`
//! - a PostScript `%%HiResBoundingBox` / `%%BoundingBox` comment
//!
//! Only the header is inspected; page content is never parsed.

use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use tracing::debug;

use super::PageSpec;

static HIRES_BBOX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^%%HiResBoundingBox:\s*([-+\d.eE]+)\s+([-+\d.eE]+)\s+([-+\d.eE]+)\s+([-+\d.eE]+)")
        .unwrap()
});

static BBOX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^%%BoundingBox:\s*([-+\d.eE]+)\s+([-+\d.eE]+)\s+([-+\d.eE]+)\s+([-+\d.eE]+)")
        .unwrap()
});

static LENGTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*(pt|bp|px|pc|mm|cm|in)?\s*$")
        .unwrap()
});

/// Extract the declared geometry of one page.
///
/// `extension` picks the primary parser (`svg` tries the root element first);
/// every format falls back to a bounding-box comment. Returns `None` when
/// nothing usable is declared so the caller can substitute
/// [`PageSpec::fallback`].
#[must_use]
pub fn parse_page_markup(content: &str, extension: &str) -> Option<PageSpec> {
    let svg = if extension.eq_ignore_ascii_case("svg") {
        parse_svg_root(content)
    } else {
        None
    };

    svg.or_else(|| parse_bounding_box(content))
        .filter(PageSpec::is_usable)
}

/// Read `viewBox` (preferred) or `width`/`height` from the root `<svg>`.
fn parse_svg_root(content: &str) -> Option<PageSpec> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                if e.local_name().as_ref() != b"svg" {
                    debug!(
                        "root element is <{}>, not <svg>",
                        String::from_utf8_lossy(e.name().as_ref())
                    );
                    return None;
                }
                return svg_root_spec(&e);
            }
            Ok(Event::Eof) => return None,
            Err(e) => {
                debug!("XML parse error in page header: {e}");
                return None;
            }
            // Declarations, comments, doctype, processing instructions.
            _ => {}
        }
        buf.clear();
    }
}

fn svg_root_spec(root: &BytesStart<'_>) -> Option<PageSpec> {
    let mut view_box = None;
    let mut width = None;
    let mut height = None;

    for attr in root.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).to_string();
        match attr.key.as_ref() {
            b"viewBox" => view_box = Some(value),
            b"width" => width = Some(value),
            b"height" => height = Some(value),
            _ => {}
        }
    }

    if let Some(spec) = view_box.as_deref().and_then(parse_view_box) {
        return Some(spec);
    }

    // Without a viewBox the user space is one unit per px.
    let width = width.as_deref().and_then(parse_length)?;
    let height = height.as_deref().and_then(parse_length)?;
    let spec = PageSpec::new(width, height);
    spec.is_usable().then_some(spec)
}

/// `"minx miny width height"`, separated by whitespace and/or commas.
fn parse_view_box(value: &str) -> Option<PageSpec> {
    let numbers: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .ok()?;

    let [min_x, min_y, width, height] = numbers[..] else {
        return None;
    };

    let spec = PageSpec::new(width, height).with_origin(min_x, min_y);
    spec.is_usable().then_some(spec)
}

/// A CSS/SVG length in user units (`px`), the unit a `viewBox` is written in.
/// Percentages and unknown units are rejected.
fn parse_length(value: &str) -> Option<f64> {
    let caps = LENGTH_REGEX.captures(value)?;
    let number: f64 = caps.get(1)?.as_str().parse().ok()?;

    let factor = match caps.get(2).map(|m| m.as_str()) {
        None | Some("px") => 1.0,
        Some("pt" | "bp") => 96.0 / 72.0,
        Some("pc") => 16.0,
        Some("in") => 96.0,
        Some("cm") => 96.0 / 2.54,
        Some("mm") => 96.0 / 25.4,
        Some(_) => return None,
    };

    Some(number * factor)
}

fn parse_bounding_box(content: &str) -> Option<PageSpec> {
    let caps = HIRES_BBOX_REGEX
        .captures(content)
        .or_else(|| BBOX_REGEX.captures(content))?;

    let mut coords = [0.0_f64; 4];
    for (slot, index) in coords.iter_mut().zip(1..=4) {
        *slot = caps.get(index)?.as_str().parse().ok()?;
    }
    let [llx, lly, urx, ury] = coords;

    let spec = PageSpec::new(urx - llx, ury - lly).with_origin(llx, lly);
    spec.is_usable().then_some(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometrySource;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn view_box_with_offset_origin() {
        let svg = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- This file was generated by dvisvgm -->
<svg version="1.1" xmlns="http://www.w3.org/2000/svg" width="612pt" height="792pt" viewBox="56.4 -10.5 612 792">
<g id="page1"></g>
</svg>"#;
        let spec = parse_page_markup(svg, "svg").unwrap();
        assert!(approx(spec.width, 612.0));
        assert!(approx(spec.height, 792.0));
        assert!(approx(spec.origin_x, 56.4));
        assert!(approx(spec.origin_y, -10.5));
        assert_eq!(spec.source, GeometrySource::Declared);
    }

    #[test]
    fn view_box_with_commas() {
        let svg = r#"<svg viewBox="0,0,595.28,841.89"/>"#;
        let spec = parse_page_markup(svg, "svg").unwrap();
        assert!(approx(spec.width, 595.28));
        assert!(approx(spec.height, 841.89));
    }

    #[test]
    fn width_height_with_units() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="8.5in" height="11in"></svg>"#;
        let spec = parse_page_markup(svg, "svg").unwrap();
        assert!(approx(spec.width, 816.0));
        assert!(approx(spec.height, 1056.0));
        assert!(approx(spec.origin_x, 0.0));

        let svg = r#"<svg width="612pt" height="792pt"></svg>"#;
        let spec = parse_page_markup(svg, "svg").unwrap();
        assert!(approx(spec.width, 816.0));
        assert!(approx(spec.height, 1056.0));
    }

    #[test]
    fn bare_and_px_lengths_agree_with_view_box() {
        let bare = parse_page_markup(r#"<svg width="800" height="600"></svg>"#, "svg").unwrap();
        let px = parse_page_markup(r#"<svg width="800px" height="600px"></svg>"#, "svg").unwrap();
        let view_box = parse_page_markup(r#"<svg viewBox="0 0 800 600"></svg>"#, "svg").unwrap();

        for spec in [&bare, &px, &view_box] {
            assert!(approx(spec.width, 800.0), "{spec:?}");
            assert!(approx(spec.height, 600.0), "{spec:?}");
        }
    }

    #[test]
    fn malformed_view_box_falls_back_to_width_height() {
        let svg = r#"<svg viewBox="0 0 abc 10" width="100" height="200"></svg>"#;
        let spec = parse_page_markup(svg, "svg").unwrap();
        assert!(approx(spec.width, 100.0));
        assert!(approx(spec.height, 200.0));
    }

    #[test]
    fn percentages_and_missing_attrs_are_not_geometry() {
        assert!(parse_page_markup(r#"<svg width="100%" height="100%"></svg>"#, "svg").is_none());
        assert!(parse_page_markup("<svg></svg>", "svg").is_none());
        assert!(parse_page_markup(r#"<svg viewBox="0 0 0 10"></svg>"#, "svg").is_none());
        assert!(parse_page_markup("<html><body/></html>", "svg").is_none());
        assert!(parse_page_markup("", "svg").is_none());
        assert!(parse_page_markup("<svg width=", "svg").is_none());
    }

    #[test]
    fn bounding_box_comment() {
        let eps = "%!PS-Adobe-3.0 EPSF-3.0\n%%Creator: dvips\n%%BoundingBox: 72 72 540 720\n%%EndComments\n";
        let spec = parse_page_markup(eps, "eps").unwrap();
        assert!(approx(spec.width, 468.0));
        assert!(approx(spec.height, 648.0));
        assert!(approx(spec.origin_x, 72.0));
        assert!(approx(spec.origin_y, 72.0));
    }

    #[test]
    fn hires_bounding_box_preferred() {
        let eps = "%%BoundingBox: 0 0 613 793\n%%HiResBoundingBox: 0 0 612.5 792.25\n";
        let spec = parse_page_markup(eps, "ps").unwrap();
        assert!(approx(spec.width, 612.5));
        assert!(approx(spec.height, 792.25));
    }

    #[test]
    fn atend_bounding_box_is_not_geometry() {
        assert!(parse_page_markup("%%BoundingBox: (atend)\n", "eps").is_none());
    }

    #[test]
    fn svg_without_root_geometry_uses_bounding_box_comment() {
        let svg = "<!--\n%%BoundingBox: 0 0 300 400\n-->\n<svg></svg>";
        let spec = parse_page_markup(svg, "svg").unwrap();
        assert!(approx(spec.width, 300.0));
        assert!(approx(spec.height, 400.0));
    }

    #[test]
    fn length_units() {
        assert!(approx(parse_length("72pt").unwrap(), 96.0));
        assert!(approx(parse_length("1pc").unwrap(), 16.0));
        assert!(approx(parse_length("25.4mm").unwrap(), 96.0));
        assert!(approx(parse_length("2.54cm").unwrap(), 96.0));
        assert!(approx(parse_length("12px").unwrap(), 12.0));
        assert!(approx(parse_length(" 3 ").unwrap(), 3.0));
        assert!(parse_length("10em").is_none());
        assert!(parse_length("").is_none());
    }
}
