//! shorenav - build navigable waypoint graphs around the land masses of a
//! water/land mask

pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod extract;
pub mod geometry;
pub mod graph;
pub mod pipeline;
pub mod refine;

pub use config::{FileConfig, NavConfig};
pub use error::{NavError, Result};
pub use pipeline::{NavOutput, Pipeline, PipelineReport};
