// Library surface for headless/integration tests and reuse.
// The binary only owns the terminal and the CLI.
pub mod app;
pub mod app_dirs;
pub mod countdown;
pub mod exercise;
pub mod fullscreen;
pub mod image;
pub mod logging;
pub mod preferences;
pub mod runtime;
pub mod session;
pub mod ui;
