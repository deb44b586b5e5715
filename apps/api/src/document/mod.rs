//! Document-generation pipeline.
//!
//! Segments flow leaf-first through `classifier` → `normalizer` →
//! `formatters` → `composer`, which wraps the result in a `templates` shell.
//! Every stage is pure and synchronous; `handlers` runs composition on a
//! blocking thread.

pub mod classifier;
pub mod composer;
pub mod formatters;
pub mod handlers;
pub mod markup;
pub mod normalizer;
pub mod templates;
