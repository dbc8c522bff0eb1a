//! Scrubline is a scroll-scrubbed animation engine: it turns scroll position,
//! viewport size and measured element geometry into animated property values,
//! pin states and snap targets.
//!
//! It renders nothing itself. A host (browser shell, native scroll view,
//! test harness) measures the page, feeds scroll offsets and timestamps, and
//! applies the returned [`FrameState`].
//!
//! # Pipeline overview
//!
//! 1. **Declare**: sections, bindings and tracks as a [`PageSpec`] (JSON manifest or [`PageBuilder`] DSL)
//! 2. **Resolve**: `PageSpec + LayoutSnapshot -> ResolvedPage` (trigger ranges, pin spacing)
//! 3. **Tick**: `scroll_y + now -> FrameState` through [`PageSession::tick`]
//! 4. **Snap** (on momentum settle): [`PageSession::on_momentum_settled`] returns a [`SnapTween`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure evaluation**: track values depend only on progress, so scrubbing backwards reproduces forward frames.
//! - **No globals**: every registry and state machine is owned by a [`PageSession`].
//! - **Runtime never errors**: missing geometry means progress 0, collapsed ranges mean progress 1.
//!
//! # Getting started
//!
//! For a walkthrough of the concepts and the public API, see [`crate::guide`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod composition;
mod eval;
mod foundation;
mod layout;
mod scroll;
mod session;
mod snap;

/// Standalone documentation of Scrubline's concepts and architecture.
pub mod guide;

pub use animation::ease::Ease;
pub use animation::track::{
    Property, PropertyTarget, PropertyValues, Segment, Span, TimelineTrack,
};
pub use composition::dsl::{
    BindingBuilder, PageBuilder, PropTween, SectionBuilder, TrackBuilder, prop,
};
pub use composition::model::{BindingSpec, PageSpec, SectionSpec, SegmentSpec, TrackSpec};
pub use eval::evaluator::{
    BindingFrame, Evaluator, FrameState, ResolvedBinding, ResolvedPage, ResolvedSection,
    SectionFrame,
};
pub use foundation::core::{Affine, ElementId, Length, Rect, SectionId, Size, Vec2, Viewport};
pub use foundation::error::{ScrubError, ScrubResult};
pub use layout::solver::{ElementBox, LayoutSnapshot, PinSpacer, ResolvedLayout};
pub use scroll::pin::{PinController, PinFrame, PinPhase, PinState};
pub use scroll::scrub::{Scrub, ScrubSmoother};
pub use scroll::trigger::{
    Edge, ElementGeometry, EndMark, Mark, ResolvedRange, TriggerSpec, progress_at,
    progress_or_inactive, resolve,
};
pub use session::config::SessionOpts;
pub use session::page::{MountHandle, PageSession};
pub use snap::coordinator::{
    DEFAULT_SNAP_TOLERANCE, NormalizedRegion, PinnedRegion, RegionId, SnapRegistry,
    compute_snap_target,
};
pub use snap::tween::{SnapTiming, SnapTween};
