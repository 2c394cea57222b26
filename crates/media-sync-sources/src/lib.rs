pub mod traits;
pub mod writer;
pub mod jellyfin;
pub mod error;

pub use traits::{CatalogClient, CatalogWriter};
pub use writer::UserWriter;
pub use error::CatalogError;
pub use jellyfin::JellyfinClient;
