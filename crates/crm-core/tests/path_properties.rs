use crm_core::guard::is_path_allowed;
use crm_core::url_state::{MemoryHistory, UrlHistory, UrlState};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 0..4).prop_map(|parts| format!("/{}", parts.join("/")))
}

fn reference(path: &str, allow_list: &[String]) -> bool {
    allow_list.iter().any(|base| {
        path == base || (base != "/" && path.starts_with(&format!("{base}/")))
    })
}

proptest! {
    #[test]
    fn allow_list_matches_exact_or_separated_prefix(
        path in path(),
        allow_list in prop::collection::vec(path(), 0..5),
    ) {
        prop_assert_eq!(
            is_path_allowed(&path, &allow_list),
            reference(&path, &allow_list)
        );
    }

    #[test]
    fn root_entry_never_acts_as_prefix(path in path()) {
        let allowed = is_path_allowed(&path, &["/"]);
        prop_assert_eq!(allowed, path == "/");
    }

    #[test]
    fn written_value_is_read_back(
        key in "[a-z]{1,5}",
        value in "[A-Za-z0-9 &=?]{0,12}",
    ) {
        let history = MemoryHistory::new("/boqs?keep=1");
        let state = UrlState::new(history.clone());
        state.set(&[(key.as_str(), Some(value.as_str()))], &[]);

        let expected = if value.is_empty() { None } else { Some(value.clone()) };
        prop_assert_eq!(state.get(&key), expected);
        prop_assert_eq!(history.location().pathname, "/boqs");
        if key != "keep" {
            let keep = state.get("keep");
            prop_assert_eq!(keep.as_deref(), Some("1"));
        }
    }
}
