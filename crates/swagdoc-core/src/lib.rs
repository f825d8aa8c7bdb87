pub mod config;
pub mod error;
pub mod load;
pub mod markdown;
pub mod model;
pub mod parse;
pub mod resolve;
pub mod suite;

pub use load::load_document;
pub use markdown::{DescriptionRenderer, PlainText};
pub use model::ApiSpecification;
pub use resolve::{BuildOptions, build};
pub use suite::ApiSuite;
