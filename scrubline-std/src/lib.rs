//! `scrubline-std` provides higher-level presets on top of the `scrubline` engine.
//!
//! The goal is to keep `scrubline` focused on the runtime and manifest schema, while
//! `scrubline-std` layers ready-made pages and reference layouts for them.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod salon;

/// Serialize any preset page into a manifest `serde_json::Value`.
pub fn page_value(page: &scrubline::PageSpec) -> scrubline::ScrubResult<serde_json::Value> {
    Ok(serde_json::to_value(page)?)
}

/// Stacked layout: each `(id, height)` follows the previous one, starting at 0.
///
/// The document height is the sum of all heights.
pub fn stacked_layout(
    viewport: scrubline::Viewport,
    blocks: &[(&str, f64)],
) -> scrubline::LayoutSnapshot {
    let total: f64 = blocks.iter().map(|(_, h)| h).sum();
    let mut snapshot = scrubline::LayoutSnapshot::new(viewport, total);
    let mut top = 0.0;
    for (id, h) in blocks {
        snapshot = snapshot.with_element(*id, top, *h);
        top += h;
    }
    snapshot
}
