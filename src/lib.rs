//! Localized server-side page rendering.
//!
//! Pages are rendered into a shared master layout; failures are classified
//! into localized 404 pages or 500 pages by the [`render::RenderManager`].

pub mod config;
pub mod handlers;
pub mod i18n;
pub mod render;
pub mod server;
pub mod template;
