//! Data types shared by the table components.

mod cell;
mod column;
mod config;
mod geometry;

pub use cell::*;
pub use column::*;
pub use config::*;
pub use geometry::*;
