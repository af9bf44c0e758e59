//! Binary file I/O for .pidx index artifacts.

pub mod compression;
pub mod reader;
pub mod writer;

pub use reader::ArtifactReader;
pub use writer::ArtifactWriter;
