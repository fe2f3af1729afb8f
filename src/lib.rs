//! cdcard lays out and renders music-release info cards.
//!
//! A card has a left panel (release date, title, cover) and a right panel (artist,
//! tracklist with staff credits, a scannable code image and a link line). Rendering is
//! two-phase:
//!
//! - [`estimate_height`] and [`plan_card`] resolve every region with a [`TextMeasure`],
//!   without touching pixels
//! - [`CardRenderer`] rasterizes the resulting [`CardPlan`] with the same font metrics
//!
//! Tracklists that do not fit are truncated above the code block with a marker line.
//! Cards without a code image can carry a QR code of their link line ([`qr_image`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod compose;
pub(crate) mod config;
pub(crate) mod layout;
pub(crate) mod model;
pub(crate) mod render;
pub(crate) mod text;

pub use crate::assets::decode::{PreparedImage, SlotFit, decode_image, prepare_for_slot};
pub use crate::assets::qr::qr_image;
pub use crate::compose::stack::{StackOptions, render_batch, stack_cards};
pub use crate::config::layout::{CardGeometry, CardLabels, FontSizes, LayoutConfig};
pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8, palette};
pub use crate::foundation::error::{CardError, CardResult};
pub use crate::layout::estimate::{
    HeightEstimate, LeftFlow, PanelHeights, RightFlow, TextLine, TextRole, TrackRow,
    estimate_height, flow_left, flow_right, panel_heights,
};
pub use crate::layout::plan::{CardPlan, CardRegions, DrawOp, ImageSlot, plan_card, role_color};
pub use crate::model::extract::{ReleaseText, extract_release};
pub use crate::model::record::{ReleaseRecord, Track, TrackNumber};
pub use crate::render::card::{CardRenderer, CardRequest};
pub use crate::render::cpu::{SlotImages, rasterize};
pub use crate::render::frame::CardImage;
pub use crate::text::fit::fit_one_line;
pub use crate::text::measure::{FixedAdvance, FontFace, ParleyMeasurer, TextMeasure};
pub use crate::text::wrap::{first_line, wrap, wrap_capped};
