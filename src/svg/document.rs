//! Root `<svg>` wrapper and the debug source view.

use super::attributes::{escape_xml, fmt_num};
use crate::types::Canvas;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Build the opening `<svg>` tag.
///
/// `width`/`height` carry the display scale; the viewBox stays in canvas units so the
/// content scales with the element.
pub fn svg_open_tag(canvas: &Canvas, extra_attrib: Option<&str>) -> String {
    let extra = extra_attrib
        .map(str::trim)
        .filter(|extra| !extra.is_empty())
        .map(|extra| format!("{} ", extra))
        .unwrap_or_default();

    format!(
        r#"<svg {}width="{}" height="{}" viewBox="0 0 {} {}" xmlns="{}" xmlns:xlink="{}">"#,
        extra,
        fmt_num(canvas.width * canvas.scale),
        fmt_num(canvas.height * canvas.scale),
        fmt_num(canvas.width),
        fmt_num(canvas.height),
        SVG_NS,
        XLINK_NS
    )
}

/// Prefix a document with a collapsed block showing its escaped source
pub fn debug_details(document: &str) -> String {
    format!(
        "<details close><summary>show html</summary><pre>{}</pre></details>\n{}",
        escape_xml(document),
        document
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_tag_scales_size_only() {
        let canvas = Canvas::new(300.0, 150.0).with_scale(0.5);
        assert_eq!(
            svg_open_tag(&canvas, None),
            r#"<svg width="150" height="75" viewBox="0 0 300 150" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#
        );
    }

    #[test]
    fn fractional_dimensions_keep_decimals() {
        let canvas = Canvas::new(15.0, 10.0).with_scale(1.5);
        assert!(svg_open_tag(&canvas, None).starts_with(r#"<svg width="22.5" height="15" "#));
    }

    #[test]
    fn blank_extra_attrib_adds_nothing() {
        let canvas = Canvas::new(10.0, 10.0);
        assert_eq!(svg_open_tag(&canvas, Some("  ")), svg_open_tag(&canvas, None));
        assert!(svg_open_tag(&canvas, Some(r#"id="a""#)).starts_with(r#"<svg id="a" width"#));
    }

    #[test]
    fn debug_block_escapes_source() {
        let wrapped = debug_details("<svg>&</svg>");
        assert_eq!(
            wrapped,
            "<details close><summary>show html</summary><pre>&lt;svg&gt;&amp;&lt;/svg&gt;</pre></details>\n<svg>&</svg>"
        );
    }
}
