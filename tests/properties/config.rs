//! Property tests for config parsing.

use std::time::Duration;

use proptest::prelude::*;

use regen::{ColorMode, Config};

fn mixed_case(word: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
        word.chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Any non-negative debounce in the config file is honored as milliseconds.
    #[test]
    fn property_debounce_round_trips_through_toml(ms in 0u64..=3_600_000) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regen.toml");
        std::fs::write(&path, format!("[watch]\ndebounce_ms = {ms}\n")).unwrap();

        let config = Config::load(&path).unwrap();
        prop_assert_eq!(config.debounce(), Duration::from_millis(ms));
    }

    /// PROPERTY: Color mode names are case-insensitive and ignore surrounding whitespace.
    #[test]
    fn property_color_mode_parse_ignores_case(
        name in mixed_case("always"),
        pad_left in "[ \t]{0,3}",
        pad_right in "[ \t]{0,3}",
    ) {
        let raw = format!("{pad_left}{name}{pad_right}");
        prop_assert_eq!(ColorMode::parse(&raw), Some(ColorMode::Always));
    }

    /// PROPERTY: Anything that is not a mode name is rejected rather than guessed.
    #[test]
    fn property_color_mode_parse_rejects_other_words(raw in "[a-z]{1,10}") {
        prop_assume!(!matches!(raw.as_str(), "auto" | "always" | "never"));
        prop_assert_eq!(ColorMode::parse(&raw), None);
    }
}
