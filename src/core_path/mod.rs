pub mod resolver;

pub use resolver::{normalize, resolve};
