//! Request parameters as a flat string map.
//!
//! Empty values count as absent. Integer coercion happens here so that the
//! router only ever sees typed, range-checked numbers.

use std::collections::HashMap;

use crate::error::QueryError;

/// Query-string parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet(HashMap<String, String>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Value of `name`, treating an empty string as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// First present value among `names`.
    pub fn first_of<'a>(&'a self, names: &[&str]) -> Option<(&'a str, &'a str)> {
        names
            .iter()
            .filter_map(|name| self.0.get_key_value(*name))
            .find(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Value of `name` or a `"<name> parameter is required"` validation error.
    pub fn require(&self, name: &str) -> Result<&str, QueryError> {
        self.get(name)
            .ok_or_else(|| QueryError::missing_parameter(name))
    }

    /// Optional integer in `min..=max`, `default` when absent.
    pub fn int_in_range(
        &self,
        name: &str,
        default: u32,
        min: u32,
        max: u32,
    ) -> Result<u32, QueryError> {
        let Some(raw) = self.get(name) else {
            return Ok(default);
        };
        let expectation = if max == u32::MAX {
            format!("an integer greater than or equal to {}", min)
        } else {
            format!("an integer between {} and {}", min, max)
        };
        match raw.trim().parse::<u32>() {
            Ok(value) if (min..=max).contains(&value) => Ok(value),
            _ => Err(QueryError::invalid_integer(name, &expectation)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for ParameterSet {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
