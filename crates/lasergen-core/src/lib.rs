//! # Lasergen Core
//!
//! Numeric building blocks shared by every lasergen crate: a 2D [`Vector`],
//! a small rectangular [`Matrix`], scalar helpers for angles and linear maps,
//! the global [`TOLERANCES`], and the machine unit/mode enums used by the
//! settings and compiler crates.

pub mod constants;
pub mod error;
pub mod math;
pub mod matrix;
pub mod units;
pub mod vector;

pub use constants::{Tolerances, TOLERANCES};
pub use error::{MathError, Result};
pub use matrix::Matrix;
pub use units::{DistanceMode, LaserMode, Unit};
pub use vector::Vector;
