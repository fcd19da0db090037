//! tiledit: a rope-backed text model, a tiled drawer and the edit commands
//! that tie them together.
//!
//! The member crates are re-exported so hosts can depend on this one crate.

/// Headless rendering used by the `tiledit-render` binary.
pub mod render;

pub use tiledit_core;
pub use tiledit_draw;
pub use tiledit_edit;

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` overrides the default
/// `tiledit=info` filter. Calling it twice is harmless.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("tiledit=info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init();
}
