use media_sync_models::{Item, LibrarySnapshot};

/// Played, partially played or favorited: the only items pushed anywhere
pub fn is_interesting(item: &Item) -> bool {
    item.user_data.is_interesting()
}

/// Interesting items of a snapshot, in snapshot order
pub fn interesting_items(snapshot: &LibrarySnapshot) -> impl Iterator<Item = &Item> {
    snapshot.items.iter().filter(|item| is_interesting(item))
}
