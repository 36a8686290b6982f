//! Property tests for the NDJSON event stream.

use proptest::prelude::*;

use regen::{ChangeEvent, ChangeKind, WatchEvent};

fn kind() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Created),
        Just(ChangeKind::Modified),
        Just(ChangeKind::Deleted),
    ]
}

/// Path segments including quotes, backslashes and non-ASCII
fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _.\\-\"\\\\é漢]{1,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every change event serializes to one line of valid JSON that
    /// names the command and keeps the path intact.
    #[test]
    fn property_file_changed_is_one_json_line(
        kind in kind(),
        segments in proptest::collection::vec(segment(), 1..=5),
    ) {
        let path = format!("/{}", segments.join("/"));
        let json = WatchEvent::from(&ChangeEvent::new(kind, path.clone())).to_json();

        prop_assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&value["command"], "watch");
        prop_assert_eq!(&value["event"], "file_changed");
        prop_assert_eq!(value["path"].as_str(), Some(path.as_str()));
        prop_assert!(value.get("previous").is_none());
    }

    /// PROPERTY: Renames carry both sides of the move.
    #[test]
    fn property_renamed_keeps_both_paths(from in segment(), to in segment()) {
        let from = format!("/site/{from}");
        let to = format!("/site/{to}");
        let json = WatchEvent::from(&ChangeEvent::renamed(from.clone(), to.clone())).to_json();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&value["kind"], "renamed");
        prop_assert_eq!(value["path"].as_str(), Some(to.as_str()));
        prop_assert_eq!(value["previous"].as_str(), Some(from.as_str()));
    }
}
