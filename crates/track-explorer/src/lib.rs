//! Track Explorer
//!
//! Question-driven insights over music-track metadata. Each question maps to
//! one canned chart; which charts a visitor has already opened is plain
//! session state handed in and out of [`render`]. Tables are polars frames
//! wrapped in [`record_set::RecordSet`].

mod error;
mod insights;
mod prepare;
mod questions;
mod session;

pub use error::ExplorerError;
pub use insights::{build_insight, Chart, FeaturePanel, Insight, Series};
pub use prepare::prepare_tracks;
pub use questions::InsightKey;
pub use session::{
    advance, build_view, render, Action, ExplorerSession, ExplorerView, InsightPanel, Question,
    RegistryConfig, SessionRegistry, SessionSnapshot,
};
