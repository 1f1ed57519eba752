//! mcmod-updater - inspect installed Minecraft mods and check Modrinth for releases
//!
//! This crate provides:
//! - Metadata extraction from Forge/NeoForge and Fabric mod archives
//! - A Modrinth catalog client that degrades to "no data" on any failure
//! - Update classification by literal version comparison
//! - A terminal window to check, update and downgrade mods interactively

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod config;
pub mod modrinth;
pub mod mods;
pub mod tui;
pub mod updates;

pub use app::App;
pub use config::Config;
