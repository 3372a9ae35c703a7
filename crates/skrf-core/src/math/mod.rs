//! Numerical plumbing shared by the network and calibration code

pub mod linalg;
pub mod transforms;

pub use transforms::{s2t, s2y, s2z, t2s, y2s, z2s};
