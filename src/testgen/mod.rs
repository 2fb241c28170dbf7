pub mod file;
pub mod jest;
pub mod path;
pub mod pytest;
pub mod template;

pub use file::write_test_file;
pub use path::resolve_test_path;
pub use template::render;
