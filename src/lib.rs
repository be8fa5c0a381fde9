//! Portfolio Server library.
//!
//! GitHub-backed portfolio data: language skills, starred repositories and
//! README-featured projects, served as JSON over actix-web.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
