//! Template views.
//!
//! - [`View`]: a template file compiled once (or on every render in hot-reload mode)
//! - [`LocalizedView`]: a view that can resolve localized strings via `t(key)`

mod localized;
mod view;

pub use localized::LocalizedView;
pub use view::{RenderError, View};
