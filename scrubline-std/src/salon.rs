//! The salon landing page: three pinned full-viewport sections followed by
//! scroll-scrubbed content sections.
//!
//! Pinned sections share one shape: an entrance over the first 30 % of the
//! pin, a hold, and an exit from 70 % onwards. Element ids inside a section
//! are prefixed with the section id (`hero-headline`, `color-cta`).

use scrubline::{
    BindingBuilder, Ease, Length, PageBuilder, PageSpec, Property, ScrubResult, SectionBuilder,
    SectionSpec, SessionOpts, Span, TrackBuilder, Viewport, prop,
};

/// Scrub lag of every pinned section, in seconds.
pub const PIN_SCRUB_LAG: f64 = 0.6;

/// Snap tolerance the page was tuned with (fraction of the scrollable distance).
pub const SALON_SNAP_TOLERANCE: f64 = 0.02;

/// Feature rows in the hair-systems section.
pub const FEATURE_ITEMS: usize = 3;
/// Highlight rows in the experience section.
pub const HIGHLIGHT_ITEMS: usize = 3;
/// Service columns.
pub const SERVICE_COLUMNS: usize = 3;
/// Before/after cards.
pub const TRANSFORM_CARDS: usize = 3;

/// Section ids in document order.
pub const SECTION_IDS: [&str; 7] = [
    "hero",
    "color",
    "hair-systems",
    "experience",
    "services",
    "before-after",
    "booking",
];

// Nominal length of one tween in a scrub-only binding; stagger steps are
// expressed relative to it.
const TWEEN_SECS: f64 = 0.5;

fn el(section: &str, part: &str) -> String {
    format!("{section}-{part}")
}

fn items(section: &str, part: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{section}-{part}-{i}")).collect()
}

/// Stagger step as a fraction of a binding whose items each take
/// `TWEEN_SECS` and start `each_secs` apart.
fn stagger_step(each_secs: f64, count: usize) -> f64 {
    let total = TWEEN_SECS + each_secs * count.saturating_sub(1) as f64;
    each_secs / total
}

fn entrance(start: f64) -> ScrubResult<Span> {
    Span::new(start, 0.30)
}

fn exit(start: f64) -> ScrubResult<Span> {
    Span::new(start, 1.0)
}

fn pinned(id: &str, distance: &str, track: TrackBuilder) -> ScrubResult<SectionSpec> {
    SectionBuilder::new(id)
        .binding(
            BindingBuilder::scroll(id, "top top", distance)?
                .pin(true)
                .scrub_lag(PIN_SCRUB_LAG)
                .track(track.build()?)
                .build()?,
        )
        .build()
}

/// Exit phase shared by the color and hair-systems sections.
fn content_exit(
    id: &str,
    mut track: TrackBuilder,
    image_dx: Length,
    lifted: &[&str],
) -> ScrubResult<TrackBuilder> {
    track = track
        .tween(
            el(id, "headline"),
            &[
                prop(Property::X, 0.0, Length::vw(10.0)),
                prop(Property::Opacity, 1.0, 0.0),
            ],
            exit(0.70)?,
            Ease::InCubic,
        )
        .tween(
            el(id, "image"),
            &[
                prop(Property::Scale, 1.0, 1.08),
                prop(Property::X, 0.0, image_dx),
            ],
            exit(0.70)?,
            Ease::Linear,
        )
        .tween(
            el(id, "watermark"),
            &[
                prop(Property::Opacity, 0.12, 0.0),
                prop(Property::Scale, 1.0, 1.1),
            ],
            exit(0.70)?,
            Ease::InCubic,
        )
        .from_to(
            el(id, "cue"),
            Property::Opacity,
            1.0,
            0.0,
            exit(0.75)?,
            Ease::OutQuad,
        );
    for part in lifted {
        track = track.tween(
            el(id, part),
            &[
                prop(Property::Y, 0.0, Length::vh(-6.0)),
                prop(Property::Opacity, 1.0, 0.0),
            ],
            exit(0.72)?,
            Ease::InCubic,
        );
    }
    Ok(track)
}

/// Background, watermark, overlay and headline entrance shared by the
/// color and hair-systems sections.
fn backdrop_entrance(id: &str, image_scale: f64) -> ScrubResult<TrackBuilder> {
    Ok(TrackBuilder::new()
        .tween(
            el(id, "image"),
            &[
                prop(Property::Scale, image_scale, 1.0),
                prop(Property::X, Length::vw(-8.0), 0.0),
                prop(Property::Opacity, 0.6, 1.0),
            ],
            entrance(0.0)?,
            Ease::Linear,
        )
        .tween(
            el(id, "watermark"),
            &[
                prop(Property::Opacity, 0.0, 1.0),
                prop(Property::Scale, 0.9, 1.0),
            ],
            entrance(0.05)?,
            Ease::Linear,
        )
        .from_to(
            el(id, "overlay"),
            Property::Opacity,
            0.0,
            1.0,
            entrance(0.0)?,
            Ease::Linear,
        )
        .tween(
            el(id, "headline"),
            &[
                prop(Property::X, Length::vw(10.0), 0.0),
                prop(Property::Opacity, 0.0, 1.0),
            ],
            entrance(0.05)?,
            Ease::Linear,
        ))
}

fn rise(dy: Length) -> [scrubline::PropTween; 2] {
    [
        prop(Property::Y, dy, 0.0),
        prop(Property::Opacity, 0.0, 1.0),
    ]
}

/// Pinned hero: visible on load, only the exit is scrubbed.
pub fn hero() -> ScrubResult<SectionSpec> {
    let id = "hero";
    let mut track = TrackBuilder::new()
        .from_to(
            el(id, "cue-line"),
            Property::ScaleX,
            0.0,
            1.0,
            entrance(0.0)?,
            Ease::Linear,
        )
        .tween(
            el(id, "headline"),
            &[
                prop(Property::X, 0.0, Length::vw(-10.0)),
                prop(Property::Opacity, 1.0, 0.0),
            ],
            exit(0.70)?,
            Ease::InCubic,
        )
        .tween(
            el(id, "image"),
            &[
                prop(Property::Scale, 1.0, 1.08),
                prop(Property::X, 0.0, Length::vw(6.0)),
            ],
            exit(0.70)?,
            Ease::Linear,
        )
        .tween(
            el(id, "watermark"),
            &[
                prop(Property::Opacity, 0.15, 0.0),
                prop(Property::Scale, 1.0, 1.1),
            ],
            exit(0.70)?,
            Ease::InCubic,
        )
        .from_to(
            el(id, "cue"),
            Property::Opacity,
            1.0,
            0.0,
            exit(0.75)?,
            Ease::OutQuad,
        );
    for part in ["body", "cta"] {
        track = track.tween(
            el(id, part),
            &[
                prop(Property::Y, 0.0, Length::vh(-6.0)),
                prop(Property::Opacity, 1.0, 0.0),
            ],
            exit(0.72)?,
            Ease::InCubic,
        );
    }
    pinned(id, "+=130%", track)
}

/// Pinned color section.
pub fn color() -> ScrubResult<SectionSpec> {
    let id = "color";
    let track = backdrop_entrance(id, 1.10)?
        .tween(el(id, "body"), &rise(Length::vh(6.0)), entrance(0.10)?, Ease::Linear)
        .tween(el(id, "cta"), &rise(Length::vh(6.0)), entrance(0.15)?, Ease::Linear)
        .from_to(
            el(id, "cue-line"),
            Property::ScaleX,
            0.0,
            1.0,
            entrance(0.10)?,
            Ease::Linear,
        );
    let track = content_exit(id, track, Length::vw(-6.0), &["body", "cta"])?;
    pinned(id, "+=130%", track)
}

/// Pinned hair-systems section with staggered feature rows.
pub fn hair_systems() -> ScrubResult<SectionSpec> {
    let id = "hair-systems";
    let track = backdrop_entrance(id, 1.12)?
        .tween(el(id, "body"), &rise(Length::vh(5.0)), entrance(0.10)?, Ease::Linear)
        .stagger(
            items(id, "feature", FEATURE_ITEMS),
            0.03,
            &[
                prop(Property::X, Length::vw(4.0), 0.0),
                prop(Property::Opacity, 0.0, 1.0),
            ],
            entrance(0.12)?,
            Ease::Linear,
        )?
        .tween(el(id, "cta"), &rise(Length::vh(4.0)), entrance(0.18)?, Ease::Linear)
        .from_to(
            el(id, "cue-line"),
            Property::ScaleX,
            0.0,
            1.0,
            entrance(0.15)?,
            Ease::Linear,
        );
    let track = content_exit(id, track, Length::vw(-6.0), &["body", "features", "cta"])?;
    pinned(id, "+=140%", track)
}

fn reveal(
    section: &str,
    start: &str,
    end: &str,
    track: TrackBuilder,
) -> ScrubResult<scrubline::BindingSpec> {
    BindingBuilder::scroll(section, start, end)?
        .track(track.build()?)
        .build()
}

/// Experience: image, copy, divider and highlights reveal as the section enters.
pub fn experience() -> ScrubResult<SectionSpec> {
    let id = "experience";
    SectionBuilder::new(id)
        .binding(reveal(
            id,
            "top 80%",
            "top 35%",
            TrackBuilder::new().tween(
                el(id, "image"),
                &[
                    prop(Property::X, Length::vw(-8.0), 0.0),
                    prop(Property::Opacity, 0.0, 1.0),
                    prop(Property::Scale, 0.98, 1.0),
                ],
                Span::FULL,
                Ease::OutQuad,
            ),
        )?)
        .binding(reveal(
            id,
            "top 75%",
            "top 40%",
            TrackBuilder::new().tween(
                el(id, "content"),
                &[
                    prop(Property::X, Length::vw(6.0), 0.0),
                    prop(Property::Opacity, 0.0, 1.0),
                ],
                Span::FULL,
                Ease::OutQuad,
            ),
        )?)
        .binding(reveal(
            id,
            "top 70%",
            "top 45%",
            TrackBuilder::new().from_to(
                el(id, "divider"),
                Property::ScaleY,
                0.0,
                1.0,
                Span::FULL,
                Ease::OutQuad,
            ),
        )?)
        .binding(reveal(
            id,
            "top 60%",
            "top 35%",
            TrackBuilder::new().stagger(
                items(id, "highlight", HIGHLIGHT_ITEMS),
                stagger_step(0.08, HIGHLIGHT_ITEMS),
                &rise(Length::px(12.0)),
                Span::FULL,
                Ease::OutQuad,
            )?,
        )?)
        .build()
}

/// Services: heading, then the three columns.
pub fn services() -> ScrubResult<SectionSpec> {
    let id = "services";
    SectionBuilder::new(id)
        .binding(reveal(
            id,
            "top 80%",
            "top 50%",
            TrackBuilder::new().tween(
                el(id, "heading"),
                &rise(Length::px(16.0)),
                Span::FULL,
                Ease::OutQuad,
            ),
        )?)
        .binding(reveal(
            id,
            "top 70%",
            "top 40%",
            TrackBuilder::new().stagger(
                items(id, "column", SERVICE_COLUMNS),
                stagger_step(0.1, SERVICE_COLUMNS),
                &rise(Length::px(24.0)),
                Span::FULL,
                Ease::OutQuad,
            )?,
        )?)
        .build()
}

/// Before/after gallery: heading, then the cards.
pub fn before_after() -> ScrubResult<SectionSpec> {
    let id = "before-after";
    SectionBuilder::new(id)
        .binding(reveal(
            id,
            "top 80%",
            "top 50%",
            TrackBuilder::new().tween(
                el(id, "heading"),
                &rise(Length::px(16.0)),
                Span::FULL,
                Ease::OutQuad,
            ),
        )?)
        .binding(reveal(
            id,
            "top 70%",
            "top 35%",
            TrackBuilder::new().stagger(
                items(id, "card", TRANSFORM_CARDS),
                stagger_step(0.1, TRANSFORM_CARDS),
                &[
                    prop(Property::Y, 28.0, 0.0),
                    prop(Property::Opacity, 0.0, 1.0),
                    prop(Property::Scale, 0.985, 1.0),
                ],
                Span::FULL,
                Ease::OutQuad,
            )?,
        )?)
        .build()
}

/// Booking: image parallax over the whole pass, content reveal on entry.
pub fn booking() -> ScrubResult<SectionSpec> {
    let id = "booking";
    SectionBuilder::new(id)
        .binding(reveal(
            id,
            "top bottom",
            "bottom top",
            TrackBuilder::new().from_to(
                el(id, "image"),
                Property::Y,
                0.0,
                Length::vh(-4.0),
                Span::FULL,
                Ease::OutQuad,
            ),
        )?)
        .binding(reveal(
            id,
            "top 70%",
            "top 40%",
            TrackBuilder::new().tween(
                el(id, "content"),
                &rise(Length::px(18.0)),
                Span::FULL,
                Ease::OutQuad,
            ),
        )?)
        .build()
}

/// Engine options the page was tuned with.
pub fn session_opts() -> SessionOpts {
    SessionOpts {
        snap_tolerance: SALON_SNAP_TOLERANCE,
        ..SessionOpts::default()
    }
}

/// The whole page, sections in document order.
pub fn page() -> ScrubResult<PageSpec> {
    PageBuilder::new()
        .section(hero()?)?
        .section(color()?)?
        .section(hair_systems()?)?
        .section(experience()?)?
        .section(services()?)?
        .section(before_after()?)?
        .section(booking()?)?
        .session(session_opts())
        .build()
}

/// Natural (unpinned) layout of the page at `viewport`: pinned sections fill
/// one viewport, content sections are taller, and a footer closes the page.
pub fn reference_layout(viewport: Viewport) -> scrubline::LayoutSnapshot {
    let vh = viewport.height;
    crate::stacked_layout(
        viewport,
        &[
            ("hero", vh),
            ("color", vh),
            ("hair-systems", vh),
            ("experience", 1.2 * vh),
            ("services", 1.6 * vh),
            ("before-after", 1.4 * vh),
            ("booking", vh),
            ("footer", 0.5 * vh),
        ],
    )
}
