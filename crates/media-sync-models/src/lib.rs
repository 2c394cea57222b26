pub mod item;
pub mod catalog_item;
pub mod snapshot;
pub mod write;

pub use item::{Item, ItemKind, ProviderIds, UserData};
pub use catalog_item::{CatalogItem, CatalogUserData};
pub use snapshot::LibrarySnapshot;
pub use write::{RemoteWrite, WriteOutcome, WriteStatus};
