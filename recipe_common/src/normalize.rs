//! Canonical comparison key for item names

/// Turn a free-form item name into the key used for uniqueness and lookup.
///
/// Surrounding whitespace is dropped and the rest is case-folded, so
/// `"Dirt"`, `" dirt "` and `"DIRT"` all collide. Applying it twice gives
/// the same key as applying it once.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_variants_collide() {
        assert_eq!(normalize_name("Dirt"), "dirt");
        assert_eq!(normalize_name("dirt"), "dirt");
        assert_eq!(normalize_name("DIRT"), "dirt");
    }

    #[test]
    fn trims_surrounding_whitespace_only() {
        assert_eq!(normalize_name("  Dirt Seed\t"), "dirt seed");
        // Inner spacing is part of the name
        assert_eq!(normalize_name("Dirt  Seed"), "dirt  seed");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["Dirt Seed", "  ROCK seed ", "Ünïcödé Block", "", "   "] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn folds_non_ascii() {
        assert_eq!(normalize_name("ÄRMEL"), "ärmel");
    }

    #[test]
    fn blank_input_becomes_empty_key() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
    }
}
