//! Application services layer.

pub mod error;
pub mod faqs;
pub mod repos;
pub mod translation;
