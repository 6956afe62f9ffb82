pub mod renderer;

pub use renderer::{Renderer, grid_lines};
