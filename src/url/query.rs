//! Query-string multidict.
//!
//! A query is an ordered sequence of `(key, value)` pairs in which a key may
//! repeat and a value may be absent (`?flag` has key `flag`, value `None`).
//! Every operation returns a new [`QueryPairs`].

use std::collections::BTreeMap;

use crate::core::encoder::escape_delimiters;
use crate::types::Component;

/// One query parameter. The value is `None` when the pair had no `=`.
pub type QueryPair = (String, Option<String>);

/// Ways to supply a query when building a URL.
///
/// Resolved once into canonical ordered pairs by [`QueryPairs::from_input`].
/// Only the `Pairs` and `Text` forms can carry duplicate keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    /// Keys in sorted order, one value each.
    Map(BTreeMap<String, Option<String>>),
    /// Explicit ordered pairs.
    Pairs(Vec<QueryPair>),
    /// Raw query text without the leading `?`.
    Text(String),
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, Option<V>>> for QueryInput {
    fn from(map: BTreeMap<K, Option<V>>) -> Self {
        QueryInput::Map(
            map.into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, Option<V>)>> for QueryInput {
    fn from(pairs: Vec<(K, Option<V>)>) -> Self {
        QueryInput::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        )
    }
}

impl From<&str> for QueryInput {
    fn from(text: &str) -> Self {
        QueryInput::Text(text.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(text: String) -> Self {
        QueryInput::Text(text)
    }
}

impl From<QueryPairs> for QueryInput {
    fn from(pairs: QueryPairs) -> Self {
        QueryInput::Pairs(pairs.0)
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryPairs(Vec<QueryPair>);

pub(crate) static EMPTY_QUERY: QueryPairs = QueryPairs(Vec::new());

impl QueryPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split raw query text on `&`, and each pair on its first `=`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperurl::QueryPairs;
    ///
    /// let query = QueryPairs::parse("a=b&c&d=e=f");
    /// assert_eq!(query.get("a"), vec![Some("b")]);
    /// assert_eq!(query.get("c"), vec![None]);
    /// assert_eq!(query.get("d"), vec![Some("e=f")]);
    /// ```
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        QueryPairs(
            text.split('&')
                .map(|pair| match pair.split_once('=') {
                    Some((key, value)) => (key.to_string(), Some(value.to_string())),
                    None => (pair.to_string(), None),
                })
                .collect(),
        )
    }

    /// A lone valueless empty key renders as nothing at all, so it is kept
    /// as the empty query it re-parses to.
    fn from_pairs(pairs: Vec<QueryPair>) -> Self {
        match pairs.as_slice() {
            [(key, None)] if key.is_empty() => Self::default(),
            _ => QueryPairs(pairs),
        }
    }

    pub fn from_input(input: impl Into<QueryInput>) -> Self {
        match input.into() {
            QueryInput::Map(map) => Self::from_pairs(map.into_iter().collect()),
            QueryInput::Pairs(pairs) => Self::from_pairs(pairs),
            QueryInput::Text(text) => Self::parse(&text),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryPair> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[QueryPair] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<QueryPair> {
        self.0
    }

    /// All values for `key`, in encounter order. Empty if the key is absent.
    pub fn get(&self, key: &str) -> Vec<Option<&str>> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
            .collect()
    }

    /// Append a pair at the end.
    pub fn add(&self, key: &str, value: Option<&str>) -> Self {
        let mut pairs = self.0.clone();
        pairs.push((key.to_string(), value.map(str::to_string)));
        Self::from_pairs(pairs)
    }

    /// Replace every occurrence of `key` with a single pair placed where the
    /// first occurrence was, or at the end if there was none.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperurl::QueryPairs;
    ///
    /// let query = QueryPairs::parse("x=1&y=2&x=3").set("x", Some("z"));
    /// assert_eq!(query.to_text(), "x=z&y=2");
    /// ```
    pub fn set(&self, key: &str, value: Option<&str>) -> Self {
        self.set_matching(|k| k == key, key, value)
    }

    /// Remove every pair with `key`.
    pub fn remove(&self, key: &str) -> Self {
        self.remove_with(key, None, None)
    }

    /// Remove pairs with `key`, in order.
    ///
    /// `value` restricts removal to pairs with that exact value (`Some(None)`
    /// matches valueless pairs); `limit` caps how many pairs are removed.
    pub fn remove_with(&self, key: &str, value: Option<Option<&str>>, limit: Option<usize>) -> Self {
        self.remove_matching(
            |k| k == key,
            |v| match value {
                None => true,
                Some(expected) => v == expected,
            },
            limit,
        )
    }

    pub(crate) fn set_matching(&self, matches_key: impl Fn(&str) -> bool, key: &str, value: Option<&str>) -> Self {
        let first = self.0.iter().position(|(k, _)| matches_key(k));
        let mut pairs: Vec<QueryPair> = self
            .0
            .iter()
            .filter(|(k, _)| !matches_key(k))
            .cloned()
            .collect();

        let new_pair = (key.to_string(), value.map(str::to_string));
        match first {
            // Pairs before the first match are all kept, so its index is unchanged.
            Some(index) => pairs.insert(index, new_pair),
            None => pairs.push(new_pair),
        }
        Self::from_pairs(pairs)
    }

    pub(crate) fn remove_matching(
        &self,
        matches_key: impl Fn(&str) -> bool,
        matches_value: impl Fn(Option<&str>) -> bool,
        limit: Option<usize>,
    ) -> Self {
        let mut remaining = limit.unwrap_or(usize::MAX);
        let pairs = self
            .0
            .iter()
            .filter(|(k, v)| {
                if remaining > 0 && matches_key(k) && matches_value(v.as_deref()) {
                    remaining -= 1;
                    false
                } else {
                    true
                }
            })
            .cloned()
            .collect();
        Self::from_pairs(pairs)
    }

    /// Serialize without the leading `?`. Only delimiters that would split a
    /// key or value differently on re-parse are escaped.
    pub fn to_text(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| {
                let key = escape_delimiters(Component::QueryKey, key);
                match value {
                    Some(value) => format!("{}={}", key, escape_delimiters(Component::QueryValue, value)),
                    None => key.into_owned(),
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    pub(crate) fn map_parts(&self, mut f: impl FnMut(Component, &str) -> String) -> Self {
        QueryPairs(
            self.0
                .iter()
                .map(|(k, v)| {
                    (
                        f(Component::QueryKey, k),
                        v.as_deref().map(|v| f(Component::QueryValue, v)),
                    )
                })
                .collect(),
        )
    }
}

impl FromIterator<QueryPair> for QueryPairs {
    fn from_iter<I: IntoIterator<Item = QueryPair>>(iter: I) -> Self {
        QueryPairs::from_pairs(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a QueryPairs {
    type Item = &'a QueryPair;
    type IntoIter = std::slice::Iter<'a, QueryPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
