//! SVG composition.
//!
//! Writes a [`SlideLayout`] as a standalone SVG document. The document's
//! `viewBox` is always the layout's pixel size; the `width`/`height`
//! attributes may differ so the same layout can be shown smaller (preview)
//! or rasterized at a multiple of its size.
//!
//! Paint order: base fill, background, text blocks, stickers.

use std::fmt::Write;

use crate::layout::{
    BackgroundLayer, GridCell, Rect, SlideLayout, TextBlock, OUTLINE_COLOR, PLACEHOLDER_FILL,
    PLACEHOLDER_FONT_SIZE, PLACEHOLDER_LABEL, PLACEHOLDER_TEXT_COLOR, RENDER_TEXT_COLOR,
};

/// Fallback appended to every authored font family.
pub const FALLBACK_FONT_FAMILY: &str = "sans-serif";

/// Compose the SVG for `layout` at its own pixel size.
#[must_use]
pub fn render_svg(layout: &SlideLayout, base_fill: &str) -> String {
    render_svg_sized(layout, base_fill, layout.width, layout.height)
}

/// Compose the SVG for `layout`, declaring a display size of
/// `display_width` x `display_height`.
#[must_use]
pub fn render_svg_sized(
    layout: &SlideLayout,
    base_fill: &str,
    display_width: f32,
    display_height: f32,
) -> String {
    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{display_width}\" height=\"{display_height}\" viewBox=\"0 0 {} {}\">",
        layout.width, layout.height,
    );

    let _ = write!(
        svg,
        "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>",
        layout.width,
        layout.height,
        escape_xml(base_fill),
    );

    render_background(&mut svg, layout);
    for block in &layout.texts {
        render_text_block(&mut svg, block);
    }
    for sticker in &layout.stickers {
        render_image(&mut svg, &sticker.src, sticker.rect, "xMidYMid meet");
    }

    svg.push_str("</svg>");
    svg
}

fn render_background(svg: &mut String, layout: &SlideLayout) {
    let full = Rect {
        x: 0.0,
        y: 0.0,
        width: layout.width,
        height: layout.height,
    };
    match &layout.background {
        BackgroundLayer::Color(color) => {
            let _ = write!(
                svg,
                "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                layout.width,
                layout.height,
                escape_xml(color),
            );
        }
        BackgroundLayer::Image(Some(src)) => render_image(svg, src, full, "xMidYMid slice"),
        BackgroundLayer::Image(None) => {}
        BackgroundLayer::Grid(cells) => {
            for cell in cells {
                render_grid_cell(svg, cell, layout.scale);
            }
        }
    }
}

fn render_grid_cell(svg: &mut String, cell: &GridCell, scale: f32) {
    let r = cell.rect;
    if let Some(src) = &cell.src {
        render_image(svg, src, r, "xMidYMid slice");
        return;
    }

    let _ = write!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{PLACEHOLDER_FILL}\"/>",
        r.x, r.y, r.width, r.height,
    );
    let font_px = PLACEHOLDER_FONT_SIZE * scale;
    let cx = r.x + r.width / 2.0;
    let cy = r.y + r.height / 2.0 + font_px * 0.35;
    let _ = write!(
        svg,
        "<text x=\"{cx}\" y=\"{cy}\" font-size=\"{font_px}\" fill=\"{PLACEHOLDER_TEXT_COLOR}\" text-anchor=\"middle\" font-family=\"{FALLBACK_FONT_FAMILY}\">{PLACEHOLDER_LABEL}</text>",
    );
}

fn render_text_block(svg: &mut String, block: &TextBlock) {
    let family = format!("{}, {FALLBACK_FONT_FAMILY}", escape_xml(&block.font_family));
    let o = block.outline;
    let offsets = [(-o, -o), (o, -o), (-o, o), (o, o)];

    let _ = write!(
        svg,
        "<g font-size=\"{}\" font-family=\"{family}\" font-weight=\"bold\" text-anchor=\"middle\">",
        block.font_px,
    );
    for (index, line) in block.lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let text = escape_xml(line);
        let x = block.center_x;
        let y = block.baseline(index);
        for (dx, dy) in offsets {
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" fill=\"{OUTLINE_COLOR}\" xml:space=\"preserve\">{text}</text>",
                x + dx,
                y + dy,
            );
        }
        let _ = write!(
            svg,
            "<text x=\"{x}\" y=\"{y}\" fill=\"{RENDER_TEXT_COLOR}\" xml:space=\"preserve\">{text}</text>",
        );
    }
    svg.push_str("</g>");
}

fn render_image(svg: &mut String, src: &str, r: Rect, aspect: &str) {
    let _ = write!(
        svg,
        "<svg x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"><image width=\"100%\" height=\"100%\" preserveAspectRatio=\"{aspect}\" xlink:href=\"{}\"/></svg>",
        r.x,
        r.y,
        r.width,
        r.height,
        escape_xml(src),
    );
}

/// Escape special XML characters.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
