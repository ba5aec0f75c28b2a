//! A textured cube spinning under a hand-derived perspective projection.
//!
//! The library half holds everything that can be exercised without a window:
//! the projection kernel, the cube geometry and the configuration, next to the
//! OpenGL wrappers in [`abs`] and the frame driver in [`demo`].

pub mod abs;
pub mod config;
pub mod cube;
pub mod demo;
pub mod logging;
pub mod projection;
