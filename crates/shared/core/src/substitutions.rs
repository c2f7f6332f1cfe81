use crate::value::Value;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Named values supplied when an error is raised.
///
/// Names are unique; inserting an existing name replaces its value. Iteration
/// is ordered by name, so two sets built from the same pairs in any order are
/// equal and render identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Substitutions(BTreeMap<Cow<'static, str>, Value>);

impl Substitutions {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a value and returns the set, for chained construction.
    #[must_use]
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Inserts a value, returning the previous value bound to `name`.
    pub fn insert(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|name| &**name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (&**name, value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Substitutions
where
    K: Into<Cow<'static, str>>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut subs = Self::new();
        subs.extend(iter);
        subs
    }
}

impl<K, V> Extend<(K, V)> for Substitutions
where
    K: Into<Cow<'static, str>>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Substitutions
where
    K: Into<Cow<'static, str>>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Substitutions {
    type Item = (Cow<'static, str>, Value);
    type IntoIter = btree_map::IntoIter<Cow<'static, str>, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_irrelevant() {
        let a = Substitutions::new().with("field", "email").with("extra", 1_i32);
        let b = Substitutions::from([("extra", Value::from(1_i32)), ("field", Value::from("email"))]);
        assert_eq!(a, b);
        assert_eq!(a.names().collect::<Vec<_>>(), ["extra", "field"]);
    }

    #[test]
    fn insert_replaces_existing_value() {
        let mut subs = Substitutions::new();
        assert!(subs.insert("n", 1_i32).is_none());
        assert_eq!(subs.insert("n", 2_i32), Some(Value::Int(1)));
        assert_eq!(subs.get("n"), Some(&Value::Int(2)));
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn collects_from_owned_names() {
        let subs: Substitutions = (0..3_i32).map(|i| (format!("v{i}"), i)).collect();
        assert!(subs.contains("v2"));
        assert!(!subs.contains("v3"));
        assert!(!subs.is_empty());
    }

    #[test]
    fn serializes_as_map() {
        let subs = Substitutions::new().with("args", vec!["a", "b"]).with("code", 2_u8);
        let json = serde_json::to_value(&subs).unwrap();
        assert_eq!(json, serde_json::json!({ "args": ["a", "b"], "code": 2 }));
    }
}
