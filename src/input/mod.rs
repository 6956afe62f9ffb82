pub mod handler;

pub use handler::{InputHandler, KeyAction, classify_swipe};
