//! Static asset constants (CSS and JavaScript).

/// Stylesheet for the wizard pages.
pub const CSS: &str = include_str!("style.css");

/// Browser controller for the wizard steps.
pub const JS: &str = include_str!("wizard.js");
