//! Core types for Skein: passages, the item/stat catalog, inventories,
//! shops, and the player character.
//!
//! This crate is independent of the template language and the story engine.
//! Everything here can be built programmatically or deserialized from a
//! story file.

/// Item and stat catalog entries.
pub mod catalog;
/// The player character: stats, inventory, and death condition.
pub mod character;
/// Story configuration and its defaults.
pub mod config;
/// Serialized story files.
pub mod data;
/// Error types used throughout the crate.
pub mod error;
/// Fixed-capacity item containers.
pub mod inventory;
/// Authored passages.
pub mod passage;
/// Priced item catalogs backed by an inventory view.
pub mod shop;
/// The fixed panel/button theme set.
pub mod theme;

/// Re-export catalog types.
pub use catalog::{Item, Stat};
/// Re-export the character.
pub use character::Character;
/// Re-export configuration.
pub use config::StoryConfig;
/// Re-export story file types.
pub use data::StoryData;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export inventory types.
pub use inventory::Inventory;
/// Re-export passage types.
pub use passage::{Passage, PassageId};
/// Re-export shop types.
pub use shop::{Shop, ShopEntry};
