pub mod error;
pub mod reader;

pub use error::FatscopeError;
pub use reader::ImageReader;
