//! Resolution of resource locations relative to the data root.

/// Directory holding every JSON resource the dashboard reads.
pub const DATA_ROOT: &str = "data/";

pub const DEFAULT_SOURCE_LOCATION: &str = "data/agents_data.json";

pub const DEFAULT_CONFIG_LOCATION: &str = "data/dataset_config.json";

pub fn is_absolute_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Places a configured source under the data root unless it is already an
/// absolute URL or already prefixed. Blank sources resolve to nothing.
pub fn prefix_data_path(source: &str) -> Option<String> {
    let source = source.trim();
    if source.is_empty() {
        return None;
    }
    if is_absolute_url(source) || source.starts_with(DATA_ROOT) {
        return Some(source.to_string());
    }
    Some(format!("{}{}", DATA_ROOT, source))
}

/// Appends a uniqueness token so intermediaries cannot serve a stale copy.
pub fn with_cache_buster(url: &str, token: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}_={}", url, separator, token)
}
