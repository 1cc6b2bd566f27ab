//! Multilingual FAQ service: CRUD over FAQs with automatic translation on
//! write and a per-language read-through list cache.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
