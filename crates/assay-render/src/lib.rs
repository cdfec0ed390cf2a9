//! Rendering utilities for finished assessments (Markdown, terminal summary).

#![forbid(unsafe_code)]

mod markdown;
mod model;
mod summary;

pub use markdown::render_markdown;
pub use model::{RenderableAssessment, RenderableResult, RenderableStat, RenderableVerdict};
pub use summary::render_summary;
