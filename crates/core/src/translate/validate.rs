/// Lower-case phrases that mark a provider error message posing as a
/// translation.
pub const FAILURE_MARKERS: &[&str] = &["error", "failed", "quota exceeded", "service unavailable"];

/// Opt-in sanity check for a translation. The orchestrator never calls it.
///
/// `_target_label` is accepted so callers can pass the display name they
/// already hold; no check depends on it yet.
pub fn is_valid_translation(original: &str, translated: &str, _target_label: &str) -> bool {
    if translated.trim().is_empty() || translated == original {
        return false;
    }

    let lower = translated.to_lowercase();
    !FAILURE_MARKERS.iter().any(|marker| lower.contains(marker))
}
