//! Corporate stress analytics: CSV loading, filtering, descriptive
//! statistics, and chart rendering over employee stress datasets.
//!
//! The same core feeds two front ends: the interactive egui dashboard
//! (`stress-scope`) and the batch PNG/console reporter (`batch_report`).

pub mod app;
pub mod charts;
pub mod data;
pub mod error;
pub mod report;
pub mod state;
pub mod stats;
pub mod theme;
pub mod ui;
