//! Library crate for backpack-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Bounded item storage (`inventory`)
//! - Keyed insertion sort (`sort`) and name binary search (`search`)
//! - Error and result types (`error`)
//! - Application state and update loop (`app`)
//! - UI rendering (`ui`) and log setup (`logging`)
//!
//! It is used by the `backpack-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod search;
pub mod sort;
pub mod ui;

pub use error::{DynError, InventoryError, Result};
pub use inventory::{CAPACITY, Inventory, Item};
pub use sort::SortKey;
