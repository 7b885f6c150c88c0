//! In-world UI. Sprite-based so it stays asset-free and headless-safe.

pub mod hud;
