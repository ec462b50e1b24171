// Display surfaces - Desktop window and headless terminal

pub mod app;
pub mod terminal;

pub use app::BreathApp;
pub use terminal::run_headless;
