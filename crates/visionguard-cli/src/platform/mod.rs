//! Desktop adapters for the engine's platform traits.

mod autostart;
mod idle;
mod notify;
mod overlay;

pub use autostart::XdgAutostart;
pub use idle::{detect_idle_source, NoIdle};
pub use notify::DesktopNotifier;
pub use overlay::ConsoleOverlay;
