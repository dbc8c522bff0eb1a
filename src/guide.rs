//! # Scrubline guide
//!
//! A walkthrough of Scrubline's model and public API, for hosts integrating
//! the engine and for contributors extending it.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`TriggerSpec`](crate::TriggerSpec): an element plus a start and end [`Mark`](crate::Mark)
//!   (`"top 80%"`, `"bottom top"`) or a relative end (`"+=130%"`).
//! - [`ResolvedRange`](crate::ResolvedRange): the trigger measured against a layout, in scroll offsets.
//! - Progress: `clamp((scroll_y - start) / (end - start), 0, 1)`, see [`progress_at`](crate::progress_at).
//! - [`TimelineTrack`](crate::TimelineTrack): segments over `[0, 1]`, evaluated as a pure function of progress.
//! - [`PinController`](crate::PinController): the pin state machine of one pinned binding.
//! - [`SnapRegistry`](crate::SnapRegistry): pinned regions the page snaps into when scrolling settles.
//!
//! ---
//!
//! ## Declaring a page
//!
//! A page is a list of sections; each section has bindings; each binding has
//! one trigger, an optional pin, a scrub mode and any number of tracks.
//!
//! ```
//! use scrubline::{BindingBuilder, Ease, PageBuilder, Property, SectionBuilder, Span, TrackBuilder, prop};
//!
//! # fn main() -> scrubline::ScrubResult<()> {
//! let track = TrackBuilder::new()
//!     .tween("hero-title", &[prop(Property::Opacity, 0.0, 1.0)], Span::new(0.0, 0.3)?, Ease::OutCubic)
//!     .tween("hero-title", &[prop(Property::Opacity, 1.0, 0.0)], Span::new(0.7, 1.0)?, Ease::InCubic)
//!     .build()?;
//! let hero = SectionBuilder::new("hero")
//!     .binding(
//!         BindingBuilder::scroll("hero", "top top", "+=130%")?
//!             .pin(true)
//!             .scrub_lag(0.6)
//!             .track(track)
//!             .build()?,
//!     )
//!     .build()?;
//! let page = PageBuilder::new().section(hero)?.build()?;
//! assert_eq!(page.sections.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! The same structure loads from JSON with [`PageSpec::from_json`](crate::PageSpec::from_json).
//! Values may be pixels (`40`) or viewport-relative strings (`"8vh"`, `"-6vw"`).
//!
//! ---
//!
//! ## Driving a session
//!
//! [`PageSession`](crate::PageSession) owns every piece of runtime state:
//!
//! 1. [`mount`](crate::PageSession::mount) each section (or [`from_page`](crate::PageSession::from_page)).
//! 2. Measure the page without pin spacers and hand the result over as a
//!    [`LayoutSnapshot`](crate::LayoutSnapshot) through
//!    [`set_layout`](crate::PageSession::set_layout). Resizes go through
//!    [`on_resize`](crate::PageSession::on_resize), which is debounced.
//! 3. Call [`tick`](crate::PageSession::tick) every frame and apply the
//!    returned [`FrameState`](crate::FrameState): per-section property values,
//!    pin states and pin offsets.
//! 4. When scroll momentum settles, call
//!    [`on_momentum_settled`](crate::PageSession::on_momentum_settled) and run
//!    the returned [`SnapTween`](crate::SnapTween), if any.
//!
//! ---
//!
//! ## Pin spacing
//!
//! A pinned section holds its viewport slot for the length of its range. The
//! layout pass inserts that length as extra scroll distance after the section:
//! every element whose natural top is at or below the pinned section's natural
//! bottom moves down by the pin distance. Pins are solved in document order, so
//! a later pin is measured against geometry already shifted by earlier ones.
//!
//! ---
//!
//! ## Snapping
//!
//! A settled position `v` (fraction of the scrollable distance) snaps to the
//! center of the closest-centered pinned region containing it, widened by
//! [`SessionOpts::snap_tolerance`](crate::SessionOpts::snap_tolerance).
//! Outside every region it stays where it is. Snapping a snapped position is a
//! no-op.
