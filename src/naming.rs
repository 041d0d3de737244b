//! Clone name generation for duplicated records.
//!
//! Duplicating a product or component gives the copy a derived name rather
//! than reusing the original: `"Laptop"` becomes `"Laptop (clone)"`, and
//! further copies count upward from the highest existing clone, so
//! `"Laptop (clone) (3)"` is followed by `"Laptop (clone) (4)"` even when
//! lower indices were deleted in the meantime.

use regex::Regex;

/// Returns the next free clone name for `base` given the names already
/// present on the server.
///
/// Matching against existing names is case-insensitive and anchored: only
/// whole names of the form `"{base} (clone)"` or `"{base} (clone) (N)"`
/// count. Names that merely contain the clone form as a substring are
/// unrelated and ignored. The returned name always preserves the caller's
/// casing of `base`.
///
/// This function never fails; inputs it cannot interpret simply do not
/// contribute to the index.
pub fn next_clone_name<S: AsRef<str>>(base: &str, existing: &[S]) -> String {
    let Some(re) = clone_pattern(base) else {
        // Unbuildable pattern: fall back to the bare form rather than error.
        return format!("{base} (clone)");
    };

    let mut max_index: Option<u64> = None;
    for name in existing {
        if let Some(index) = clone_index(&re, name.as_ref()) {
            max_index = Some(max_index.map_or(index, |m| m.max(index)));
        }
    }

    match max_index {
        None => format!("{base} (clone)"),
        Some(max) => format!("{base} (clone) ({})", max.saturating_add(1)),
    }
}

/// The search fragment that narrows a server-side name query to clone
/// relatives of `base`. The anchored match in [`next_clone_name`] still
/// applies afterwards; this only trims the candidate set.
pub fn clone_search_fragment(base: &str) -> String {
    format!("{base} (clone)")
}

/// Compiles the anchored, case-insensitive pattern recognising clone
/// relatives of `base`. Metacharacters in `base` are escaped, so
/// `"C++ (v2)"` matches literally.
fn clone_pattern(base: &str) -> Option<Regex> {
    let pattern = format!(r"(?i)^{} \(clone\)(?: \((\d+)\))?$", regex::escape(base));
    Regex::new(&pattern).ok()
}

/// Extracts the clone index of `candidate`, if it is a clone relative.
///
/// The bare `"{base} (clone)"` form counts as index 0; `"{base} (clone) (N)"`
/// counts as N. Indices too large for `u64` are treated as non-matches.
fn clone_index(re: &Regex, candidate: &str) -> Option<u64> {
    let caps = re.captures(candidate)?;
    match caps.get(1) {
        None => Some(0),
        Some(digits) => digits.as_str().parse::<u64>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next(base: &str, existing: &[&str]) -> String {
        next_clone_name(base, existing)
    }

    // ─── First Clone ────────────────────────────────────────────────────────

    #[test]
    fn test_no_relatives_yields_bare_clone() {
        assert_eq!(next("Laptop", &[]), "Laptop (clone)");
        assert_eq!(next("Laptop", &["Desktop", "Laptop Pro"]), "Laptop (clone)");
    }

    #[test]
    fn test_original_name_alone_is_not_a_relative() {
        assert_eq!(next("Laptop", &["Laptop"]), "Laptop (clone)");
    }

    // ─── Counting Upward ────────────────────────────────────────────────────

    #[test]
    fn test_bare_clone_present_yields_index_one() {
        assert_eq!(next("Laptop", &["Laptop (clone)"]), "Laptop (clone) (1)");
    }

    #[test]
    fn test_increments_past_highest_index() {
        let existing = ["Laptop (clone)", "Laptop (clone) (1)"];
        assert_eq!(next("Laptop", &existing), "Laptop (clone) (2)");
    }

    #[test]
    fn test_gaps_are_not_reused() {
        // (1) and (2) were deleted; the next name still counts past (3).
        let existing = ["Laptop (clone)", "Laptop (clone) (3)"];
        assert_eq!(next("Laptop", &existing), "Laptop (clone) (4)");
    }

    #[test]
    fn test_numbered_clone_without_bare_form() {
        assert_eq!(
            next("Laptop", &["Laptop (clone) (5)"]),
            "Laptop (clone) (6)"
        );
    }

    #[test]
    fn test_out_of_order_candidates_still_count_past_max() {
        let existing = ["Laptop (clone) (2)", "Laptop (clone)", "Laptop (clone) (1)"];
        assert_eq!(next("Laptop", &existing), "Laptop (clone) (3)");
    }

    #[test]
    fn test_multi_word_base() {
        assert_eq!(next("Dell XPS", &[]), "Dell XPS (clone)");
        assert_eq!(
            next("Dell XPS", &["Dell XPS (clone)"]),
            "Dell XPS (clone) (1)"
        );
    }

    // ─── Case Insensitivity ─────────────────────────────────────────────────

    #[test]
    fn test_matching_ignores_case_but_output_keeps_base_casing() {
        assert_eq!(
            next("Laptop", &["laptop (CLONE)"]),
            "Laptop (clone) (1)"
        );
        assert_eq!(
            next("LAPTOP", &["Laptop (Clone) (2)"]),
            "LAPTOP (clone) (3)"
        );
    }

    // ─── Anchoring ──────────────────────────────────────────────────────────

    #[test]
    fn test_substring_relatives_are_ignored() {
        let existing = [
            "Laptop (clone) backup",
            "XLaptop (clone)",
            "Laptop (clone) (1) old",
        ];
        assert_eq!(next("Laptop", &existing), "Laptop (clone)");
    }

    // ─── Escaping ───────────────────────────────────────────────────────────

    #[test]
    fn test_base_with_regex_metacharacters() {
        assert_eq!(next("C++ (v2)", &[]), "C++ (v2) (clone)");
        assert_eq!(
            next("C++ (v2)", &["C++ (v2) (clone)"]),
            "C++ (v2) (clone) (1)"
        );
    }

    // ─── Malformed Entries ──────────────────────────────────────────────────

    #[test]
    fn test_non_numeric_suffix_does_not_match() {
        let existing = ["Laptop (clone) (abc)", "Laptop (clone) ()"];
        assert_eq!(next("Laptop", &existing), "Laptop (clone)");
    }

    #[test]
    fn test_overlong_index_is_skipped() {
        // 39 digits does not fit in u64; the entry contributes nothing.
        let existing = [
            "Laptop (clone) (340282366920938463463374607431768211456)",
            "Laptop (clone) (2)",
        ];
        assert_eq!(next("Laptop", &existing), "Laptop (clone) (3)");
    }

    // ─── Degenerate Inputs ──────────────────────────────────────────────────

    #[test]
    fn test_empty_base() {
        assert_eq!(next("", &[]), " (clone)");
        assert_eq!(next("", &[" (clone)"]), " (clone) (1)");
    }

    #[test]
    fn test_unicode_base() {
        assert_eq!(
            next("Siège Café", &["siège café (clone)"]),
            "Siège Café (clone) (1)"
        );
    }

    // ─── Search Fragment ────────────────────────────────────────────────────

    #[test]
    fn test_search_fragment_is_bare_clone_form() {
        assert_eq!(clone_search_fragment("Laptop"), "Laptop (clone)");
    }
}
