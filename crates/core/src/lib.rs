pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod urls;

pub use config::{AppConfig, CatalogConfig, PlayerConfig};
pub use decode::decode_results;
pub use error::{DecodeError, SearchError};
pub use model::{Preview, Track};
