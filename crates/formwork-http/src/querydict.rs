//! Dictionary of submitted key/value pairs.
//!
//! [`QueryDict`] holds URL-encoded form data or query-string parameters.
//! Keys may repeat; [`QueryDict::get`] returns the last value, matching how
//! browsers and most frameworks resolve single-valued form fields.

use std::collections::HashMap;

/// An insertion-ordered, multi-valued dictionary of submitted data.
///
/// # Examples
///
/// ```
/// use formwork_http::QueryDict;
///
/// let qd = QueryDict::parse("f_username=alice&f_email=alice%40example.com");
/// assert_eq!(qd.get("f_username"), Some("alice"));
/// assert_eq!(qd.get("f_email"), Some("alice@example.com"));
/// assert_eq!(qd.get("f_password"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDict {
    keys: Vec<String>,
    values: HashMap<String, Vec<String>>,
}

impl QueryDict {
    /// Creates a new, empty `QueryDict`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL-encoded string (e.g. `"key1=val1&key2=val2"`).
    ///
    /// Handles percent-encoding and `+` as space, and supports multiple
    /// values per key. Empty pairs are skipped.
    pub fn parse(query_string: &str) -> Self {
        let mut qd = Self::new();

        for pair in query_string.split('&') {
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair
                .find('=')
                .map_or((pair, ""), |eq_pos| (&pair[..eq_pos], &pair[eq_pos + 1..]));

            qd.append(percent_decode(key), percent_decode(value));
        }

        qd
    }

    /// Returns the last value for the given key, or `None` if not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns all values for the given key, or `None` if not present.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Appends a value to the list for the given key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !self.values.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.values.entry(key).or_default().push(value.into());
    }

    /// Sets a single value for the given key, replacing any existing values.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !self.values.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.values.insert(key, vec![value.into()]);
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the dictionary contains no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns an iterator over the keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Encodes the dictionary as a URL-encoded string, keys in insertion order.
    pub fn urlencode(&self) -> String {
        let mut parts = Vec::new();
        for key in &self.keys {
            for value in &self.values[key] {
                parts.push(format!("{}={}", percent_encode(key), percent_encode(value)));
            }
        }
        parts.join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut qd = Self::new();
        for (key, value) in iter {
            qd.append(key, value);
        }
        qd
    }
}

/// Decodes a percent-encoded form component.
fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a form component.
fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
