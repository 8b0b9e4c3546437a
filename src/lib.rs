// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # FLIC Heatmap Toolkit
//!
//! Data preparation and visualization for pose-estimation datasets stored as
//! per-joint heatmaps, such as the FLIC (Frames Labeled In Cinema) set.
//!
//! ## Features
//!
//! - **Storage** - Load images and heatmaps from `.npz` archives
//! - **Batching** - Channel-first, optionally shuffled mini-batches
//! - **Visualization** - Per-joint colored heatmap overlays on the source image
//! - **CLI** - Preview one sample of each split from the terminal
//!
//! ## Data Layout
//!
//! The data folder holds four archives, each with a single 4-D array:
//!
//! | File | Shape |
//! |------|-------|
//! | `x_train_flic.npz` | (N, H, W, 3) |
//! | `y_train_flic.npz` | (N, H, W, J) |
//! | `x_test_flic.npz` | (M, H, W, 3) |
//! | `y_test_flic.npz` | (M, H, W, J) |
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use flic_heatmaps::{Canvas, VizConfig, VizOptions, load_train_data, to_dataloader, viz_sample};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (images, heatmaps) = load_train_data("./data/")?;
//!     let loader = to_dataloader(images, heatmaps, 10, true)?;
//!
//!     for batch in &loader {
//!         println!("images {:?}, heatmaps {:?}", batch.images.shape(), batch.heatmaps.shape());
//!     }
//!
//!     // Samples are stored channel-first, so permute for display.
//!     if let Some((image, heatmap)) = loader.dataset().get(10) {
//!         let mut canvas = Canvas::new();
//!         let opts = VizOptions::new()
//!             .with_permute(true)
//!             .with_name("sample10")
//!             .with_save_dir("runs");
//!         let config = VizConfig::new();
//!         let figure = viz_sample(&mut canvas, image.view(), heatmap.view(), &opts, &config)?;
//!         println!("{} -> {:?}", figure.title, figure.saved_to);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Preview sample 10 of each split from ./data/
//! flic-heatmaps preview
//!
//! # Save the figures at full resolution
//! flic-heatmaps preview --data ./data/ --save-dir runs/preview --full-res
//!
//! # Show them in a window
//! flic-heatmaps preview --index 3 --show
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`io`] | `.npz` loading and figure saving |
//! | [`dataloader`] | [`DataLoader`] over channel-first [`TensorDataset`]s |
//! | [`visualizer`] | [`Canvas`] and [`viz_sample`] |
//! | [`joints`] | Joint names and colors ([`JOINTS`]) |
//! | [`preprocessing`] | Layout conversion and resizing |
//! | [`config`] | [`VizConfig`] rendering settings |
//! | [`error`] | Error types ([`FlicError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `annotate` | Figure titles drawn with a TrueType font (default) |
//! | `visualize` | Real-time window display (default) |
//!
//! ## License
//!
//! This project is licensed under [AGPL-3.0](https://ultralytics.com/license).

// Modules
pub mod cli;
pub mod config;
pub mod dataloader;
pub mod error;
#[cfg(feature = "annotate")]
pub mod font;
pub mod io;
pub mod joints;
pub mod preprocessing;
pub mod visualizer;

// Re-export main types for convenience
pub use config::VizConfig;
pub use dataloader::{Batch, DataLoader, TensorDataset, to_dataloader};
pub use error::{FlicError, Result};
pub use io::{load_data, load_test_data, load_train_data};
pub use joints::{JOINTS, Joint};
pub use visualizer::{Canvas, Figure, VizOptions, viz_sample};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
