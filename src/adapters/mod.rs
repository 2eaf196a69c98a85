// Adapters layer: concrete schema sources.

pub mod file;
pub mod http;

pub use file::FileSchemaSource;
pub use http::HttpSchemaSource;
