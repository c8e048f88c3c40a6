//! Page handlers for the bundled site.

mod home;
mod not_found;

pub use home::home_get;
pub use not_found::not_found;
