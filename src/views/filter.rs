//! Utility selection and the geo filter it drives.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::utility::Utility;
use crate::views::types::GeoAggregate;

pub const SHOW_ALL: &str = "Show All";

/// The utility selector's current choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    ShowAll,
    Utility(Utility),
}

impl Selection {
    /// Selector tokens in the order a front end should list them.
    pub fn tokens() -> [&'static str; 4] {
        [
            SHOW_ALL,
            Utility::Dte.display_name(),
            Utility::NationalGrid.display_name(),
            Utility::Xcel.display_name(),
        ]
    }

    /// Maps any external token to a selection.
    ///
    /// Display names and short codes match case-insensitively. Anything not
    /// recognized falls back to [`Selection::ShowAll`].
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case(SHOW_ALL) {
            return Selection::ShowAll;
        }

        match Utility::ALL.into_iter().find(|u| {
            token.eq_ignore_ascii_case(u.display_name()) || token.eq_ignore_ascii_case(u.code())
        }) {
            Some(utility) => Selection::Utility(utility),
            None => {
                warn!(token, "Unrecognized utility selection, showing all");
                Selection::ShowAll
            }
        }
    }

    /// Reads the `utility` parameter of a query string such as
    /// `?utility=National+Grid`. A missing parameter selects everything.
    pub fn from_query(query: &str) -> Self {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                Some((decode_component(key)?, decode_component(value)?))
            })
            .find(|(key, _)| key == "utility")
            .map(|(_, value)| Selection::from_token(&value))
            .unwrap_or_default()
    }

    /// The shareable query string for this selection.
    pub fn to_query(&self) -> String {
        format!("utility={}", urlencoding::encode(self.label()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Selection::ShowAll => SHOW_ALL,
            Selection::Utility(u) => u.display_name(),
        }
    }

    pub fn utility(&self) -> Option<Utility> {
        match self {
            Selection::ShowAll => None,
            Selection::Utility(u) => Some(*u),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Decodes one form-encoded query component (`+` is a space).
fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(Cow::into_owned)
}

/// Returns the geo rows belonging to the selected utility, or all of them.
pub fn filter(rows: &[GeoAggregate], selection: Selection) -> Vec<GeoAggregate> {
    match selection {
        Selection::ShowAll => rows.to_vec(),
        Selection::Utility(utility) => rows
            .iter()
            .filter(|r| r.utility == utility.code())
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(utility: &str) -> GeoAggregate {
        GeoAggregate {
            utility: utility.to_string(),
            latitude: 42.0,
            longitude: -83.0,
            enrollments: 1,
        }
    }

    fn sample() -> Vec<GeoAggregate> {
        vec![geo("dte"), geo("nationalgrid"), geo("xcel"), geo("dte"), geo("pge")]
    }

    #[test]
    fn test_show_all_is_identity() {
        let rows = sample();
        assert_eq!(filter(&rows, Selection::ShowAll), rows);
    }

    #[test]
    fn test_each_token_keeps_only_its_code() {
        let rows = sample();
        for utility in Utility::ALL {
            let selection = Selection::from_token(utility.display_name());
            let filtered = filter(&rows, selection);
            assert!(!filtered.is_empty());
            assert!(filtered.iter().all(|r| r.utility == utility.code()));
        }
        assert_eq!(filter(&rows, Selection::Utility(Utility::Dte)).len(), 2);
    }

    #[test]
    fn test_from_token() {
        assert_eq!(Selection::from_token("Show All"), Selection::ShowAll);
        assert_eq!(Selection::from_token("DTE"), Selection::Utility(Utility::Dte));
        assert_eq!(
            Selection::from_token(" national grid "),
            Selection::Utility(Utility::NationalGrid)
        );
        assert_eq!(Selection::from_token("xcel"), Selection::Utility(Utility::Xcel));
    }

    #[test]
    fn test_unknown_token_shows_all() {
        assert_eq!(Selection::from_token("PG&E"), Selection::ShowAll);
        assert_eq!(Selection::from_token(""), Selection::ShowAll);
        let rows = sample();
        assert_eq!(filter(&rows, Selection::from_token("PG&E")), rows);
    }

    #[test]
    fn test_from_query() {
        assert_eq!(
            Selection::from_query("utility=National+Grid"),
            Selection::Utility(Utility::NationalGrid)
        );
        assert_eq!(
            Selection::from_query("?tab=map&utility=Xcel%20Energy"),
            Selection::Utility(Utility::Xcel)
        );
        assert_eq!(Selection::from_query("tab=map"), Selection::ShowAll);
        assert_eq!(Selection::from_query(""), Selection::ShowAll);
    }

    #[test]
    fn test_query_round_trip() {
        for token in Selection::tokens() {
            let selection = Selection::from_token(token);
            assert_eq!(Selection::from_query(&selection.to_query()), selection);
        }
    }

    #[test]
    fn test_from_query_decodes_keys_and_values() {
        assert_eq!(
            Selection::from_query("utilit%79=DTE"),
            Selection::Utility(Utility::Dte)
        );
        assert_eq!(
            Selection::from_query("utility=National%2bGrid"),
            Selection::ShowAll
        );
        assert_eq!(decode_component("a%2Bb").as_deref(), Some("a+b"));
        assert_eq!(decode_component("Xcel+Energy").as_deref(), Some("Xcel Energy"));
    }

    #[test]
    fn test_to_query_percent_encodes() {
        assert_eq!(
            Selection::Utility(Utility::NationalGrid).to_query(),
            "utility=National%20Grid"
        );
        assert_eq!(Selection::ShowAll.to_query(), "utility=Show%20All");
    }
}
