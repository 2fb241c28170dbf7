pub mod framework;
pub mod language;

pub use framework::{detect_framework, TestFramework};
