//! StatusNotifierItem tray toggle for Cloudflare WARP.

pub mod app;
pub mod notify;
pub mod tray;

pub use app::{TrayApp, TrayError};
