use std::env;

pub const DEFAULT_ENOTIFY_PORT: u16 = 5000;
pub const DEFAULT_FAILURE_EXIT_CODE: i32 = 99;
pub const DEFAULT_SUMMARY_LINE: i64 = -1;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

pub(super) const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
pub(super) const MAX_CONNECT_TIMEOUT_MS: u64 = 600_000;
pub(super) const MAX_SUMMARY_LINE_MAGNITUDE: i64 = 10_000;

/// Derive a slot id from the working directory name: underscore-separated
/// segments are capitalized and joined, hyphens become slashes
/// (`my_cool-gem` registers as `MyCool/Gem`).
pub fn default_slot_id() -> String {
    let basename = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "Specnotify".to_string());
    slot_id_from_basename(&basename)
}

pub(super) fn slot_id_from_basename(basename: &str) -> String {
    let joined: String = basename
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    joined.replace('-', "/")
}
