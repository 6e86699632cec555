//! Range math and segment planning.
//!
//! Splits a download into N non-overlapping segments, computes HTTP Range
//! header bounds, and locates each segment's file next to the output.

mod range;

pub use range::{part_path, plan_segments, Segment};
