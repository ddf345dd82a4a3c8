//! Admin surface and resolve API over the display pipeline.
//!
//! Routes:
//! - `GET  /admin/plugins` — HTML table of installed plugins with reorder,
//!   enable/disable, and uninstall controls
//! - `POST /admin/plugins/action` — mutates the registry, then redirects back
//! - `GET  /api/plugins` — JSON listing
//! - `POST /api/resolve` — resolve one display field for a posted user
//! - `GET  /health`
//!
//! Registry mutations require the per-process `sesskey` replay token embedded
//! in the admin page's forms.

pub mod admin_routes;
pub mod resolve_routes;
pub mod server;
pub mod state;

pub use {
    server::{build_admin_app, serve},
    state::AppState,
};
