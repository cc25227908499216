//! 浏览器生命周期管理

mod headless;

pub use headless::{close_browser, launch_headless_browser};
