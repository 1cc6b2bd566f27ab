//! API handlers organized by resource type.

mod faqs;
mod health;

pub use faqs::*;
pub use health::*;
