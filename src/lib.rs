//! WebShell — a multi-window desktop web shell with tabbed browsing and a
//! home screen of pinned web apps.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod services;
pub mod surface;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
