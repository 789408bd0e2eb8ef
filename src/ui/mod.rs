pub mod board;
pub mod state;
pub mod viewer;
pub mod windows;
