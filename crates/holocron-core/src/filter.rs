// Search-as-you-type over whatever has already been loaded
use holocron_api::Resource;

/// Case-insensitive substring match on the display name
///
/// An empty query hands back the whole collection in its original order.
/// Never touches the network.
pub fn filter<T: Resource>(items: &[T], query: &str) -> Vec<T> {
    if query.is_empty() {
        return items.to_vec();
    }

    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.display_name().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
