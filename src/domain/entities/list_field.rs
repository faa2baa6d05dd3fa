use std::fmt;

use serde::de::{self, Deserializer, SeqAccess, Visitor};

/// Splits delimited free text into an ordered list, trimming entries and
/// dropping blanks. `None` yields an empty list.
pub fn split_list(raw: Option<&str>, delimiter: char) -> Vec<String> {
    raw.map(|s| {
        s.split(delimiter)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Inverse of [`split_list`] for comma lists, used when a list has to be
/// matched as a single piece of text.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

struct ListVisitor {
    delimiter: char,
}

impl<'de> Visitor<'de> for ListVisitor {
    type Value = Vec<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a {:?}-delimited string or an array of strings", self.delimiter)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(split_list(Some(v), self.delimiter))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<String>()? {
            let item = item.trim();
            if !item.is_empty() {
                items.push(item.to_string());
            }
        }
        Ok(items)
    }
}

/// `#[serde(deserialize_with)]` for comma-delimited input such as technologies.
pub fn comma_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    deserializer.deserialize_any(ListVisitor { delimiter: ',' })
}

/// `#[serde(deserialize_with)]` for newline-delimited input such as achievements.
pub fn line_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    deserializer.deserialize_any(ListVisitor { delimiter: '\n' })
}
