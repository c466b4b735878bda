//! Identifier selectors and argument normalisation.
//!
//! # Design
//! - `Selector::All` is "absent": the `ids` key is omitted, never sent as `null`.
//! - Sequences keep caller order and duplicates; the daemon handles both.
//! - `normalize` only touches `ids`; key naming is left to the facade.

use serde_json::{Map, Value};

/// Argument mapping sent as the `arguments` object of a request.
pub type Arguments = Map<String, Value>;

/// Wire key holding the identifier selector.
pub const IDS_KEY: &str = "ids";

/// Keyword selecting torrents that changed recently.
pub const RECENTLY_ACTIVE: &str = "recently-active";

/// A single torrent reference inside a selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorrentRef {
    /// Numeric id assigned by the daemon.
    Id(i64),
    /// Info-hash string.
    Hash(String),
}

impl TorrentRef {
    fn to_wire(&self) -> Value {
        match self {
            Self::Id(id) => Value::from(*id),
            Self::Hash(hash) => Value::from(hash.as_str()),
        }
    }
}

impl From<i64> for TorrentRef {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for TorrentRef {
    fn from(hash: &str) -> Self {
        Self::Hash(hash.to_string())
    }
}

impl From<String> for TorrentRef {
    fn from(hash: String) -> Self {
        Self::Hash(hash)
    }
}

/// Which torrents an operation targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    /// Every torrent; the `ids` key is omitted.
    #[default]
    All,
    /// A single torrent.
    One(TorrentRef),
    /// An ordered list of torrents (may be empty).
    Many(Vec<TorrentRef>),
    /// Torrents the daemon reports as recently active.
    RecentlyActive,
}

impl Selector {
    /// Wire representation of the selector, or `None` when the key must be omitted.
    #[must_use]
    pub fn to_wire(&self) -> Option<Value> {
        match self {
            Self::All => None,
            Self::One(item) => Some(item.to_wire()),
            Self::Many(items) => Some(Value::Array(
                items.iter().map(TorrentRef::to_wire).collect(),
            )),
            Self::RecentlyActive => Some(Value::from(RECENTLY_ACTIVE)),
        }
    }

    /// Insert the selector into an argument mapping under `ids`.
    pub fn apply(&self, arguments: &mut Arguments) {
        match self.to_wire() {
            Some(value) => {
                arguments.insert(IDS_KEY.to_string(), value);
            }
            None => {
                arguments.remove(IDS_KEY);
            }
        }
    }

    /// Parse a command-line style token list: numeric ids, hashes, or the keyword.
    ///
    /// An empty list selects every torrent.
    #[must_use]
    pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        match tokens {
            [] => Self::All,
            [single] if single.as_ref() == RECENTLY_ACTIVE => Self::RecentlyActive,
            [single] => Self::One(parse_ref(single.as_ref())),
            many => Self::Many(many.iter().map(|token| parse_ref(token.as_ref())).collect()),
        }
    }
}

fn parse_ref(token: &str) -> TorrentRef {
    token
        .parse::<i64>()
        .map_or_else(|_| TorrentRef::Hash(token.to_string()), TorrentRef::Id)
}

impl From<i64> for Selector {
    fn from(id: i64) -> Self {
        Self::One(TorrentRef::Id(id))
    }
}

impl From<&str> for Selector {
    fn from(hash: &str) -> Self {
        Self::One(TorrentRef::from(hash))
    }
}

impl<T: Into<TorrentRef>> From<Vec<T>> for Selector {
    fn from(items: Vec<T>) -> Self {
        Self::Many(items.into_iter().map(Into::into).collect())
    }
}

/// Normalise an argument mapping into the shapes the wire protocol accepts.
///
/// A missing or `null` `ids` entry is dropped; everything else is copied as-is.
#[must_use]
pub fn normalize(arguments: &Arguments) -> Arguments {
    arguments
        .iter()
        .filter(|(key, value)| !(key.as_str() == IDS_KEY && value.is_null()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn null_ids_are_omitted() {
        let input = args(json!({"ids": null, "fields": ["id"]}));
        let output = normalize(&input);
        assert!(!output.contains_key(IDS_KEY));
        assert_eq!(output.get("fields"), Some(&json!(["id"])));
    }

    #[test]
    fn mixed_sequence_keeps_order_and_duplicates() {
        let input = args(json!({"ids": ["a", "b", 3, 3]}));
        let output = normalize(&input);
        assert_eq!(output.get(IDS_KEY), Some(&json!(["a", "b", 3, 3])));
    }

    #[test]
    fn explicit_empty_and_keyword_survive() {
        let empty = normalize(&args(json!({"ids": []})));
        assert_eq!(empty.get(IDS_KEY), Some(&json!([])));

        let keyword = normalize(&args(json!({"ids": "recently-active"})));
        assert_eq!(keyword.get(IDS_KEY), Some(&json!("recently-active")));
    }

    #[test]
    fn other_keys_are_untouched_including_nulls() {
        let input = args(json!({"download-dir": null, "paused": true}));
        let output = normalize(&input);
        assert_eq!(output, input);
    }

    #[test]
    fn selector_all_removes_existing_key() {
        let mut arguments = args(json!({"ids": [1]}));
        Selector::All.apply(&mut arguments);
        assert!(arguments.is_empty());
    }

    #[test]
    fn selector_wire_shapes() {
        let mixed = Selector::Many(vec!["a".into(), "b".into(), TorrentRef::Id(3)]);
        assert_eq!(mixed.to_wire(), Some(json!(["a", "b", 3])));
        assert_eq!(Selector::from(7_i64).to_wire(), Some(json!(7)));
        assert_eq!(Selector::from("abc").to_wire(), Some(json!("abc")));
        assert_eq!(
            Selector::RecentlyActive.to_wire(),
            Some(json!("recently-active"))
        );
        assert_eq!(Selector::Many(Vec::new()).to_wire(), Some(json!([])));
        assert_eq!(Selector::All.to_wire(), None);
    }

    #[test]
    fn parse_tokens_distinguishes_ids_hashes_and_keyword() {
        let empty: [&str; 0] = [];
        assert_eq!(Selector::parse_tokens(&empty), Selector::All);
        assert_eq!(
            Selector::parse_tokens(&["recently-active"]),
            Selector::RecentlyActive
        );
        assert_eq!(Selector::parse_tokens(&["12"]), Selector::from(12_i64));
        assert_eq!(
            Selector::parse_tokens(&["12", "c0ffee"]),
            Selector::Many(vec![TorrentRef::Id(12), TorrentRef::Hash("c0ffee".into())])
        );
    }
}
