mod entry;
pub mod public;
pub mod todos;

pub use entry::{app, router};
