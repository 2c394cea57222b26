// Identity resolution between two catalogs whose item IDs are unrelated

use media_sync_models::{Item, ProviderIds};

/// Find the item in `candidates` that represents the same content as `source`
///
/// When the source has provider IDs, only a candidate carrying every one of
/// them with an equal value is accepted (extra candidate providers are fine).
/// Name/type matching is used only for sources without any provider IDs.
/// The first acceptable candidate in `candidates` order wins.
pub fn find_match<'a>(source: &Item, candidates: &'a [Item]) -> Option<&'a Item> {
    if source.provider_ids.is_empty() {
        candidates
            .iter()
            .find(|candidate| matches_by_name_and_type(source, candidate))
    } else {
        candidates
            .iter()
            .find(|candidate| provider_ids_match(&source.provider_ids, &candidate.provider_ids))
    }
}

/// True when every source provider key exists in `candidate` with the same value
///
/// A missing key counts as a mismatch. An empty `source` never matches.
pub fn provider_ids_match(source: &ProviderIds, candidate: &ProviderIds) -> bool {
    !source.is_empty()
        && source
            .iter()
            .all(|(provider, id)| candidate.get(provider) == Some(id))
}

pub fn matches_by_name_and_type(source: &Item, candidate: &Item) -> bool {
    source.name == candidate.name && source.item_type == candidate.item_type
}
