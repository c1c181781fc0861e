// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named attribute records and material physical properties.
//!
//! Attribute records are the free-form metadata CAD kernels attach to
//! assembly nodes, materials and the model itself. A record has a title
//! (textual, or numeric for sources that key attributes by integer) and
//! one or more typed entries. The conversion engine copies them into the
//! output node metadata verbatim.

/// Title of an attribute record or entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeTitle {
    Text(String),
    /// Numeric title; rendered as its decimal string when used as a key.
    Number(u32),
}

impl AttributeTitle {
    /// The title as a metadata key.
    pub fn to_key(&self) -> String {
        match self {
            AttributeTitle::Text(text) => text.clone(),
            AttributeTitle::Number(number) => number.to_string(),
        }
    }

    /// Textual title, `None` for numeric ones.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeTitle::Text(text) => Some(text),
            AttributeTitle::Number(_) => None,
        }
    }
}

impl From<&str> for AttributeTitle {
    fn from(text: &str) -> Self {
        AttributeTitle::Text(text.to_string())
    }
}

impl From<String> for AttributeTitle {
    fn from(text: String) -> Self {
        AttributeTitle::Text(text)
    }
}

impl From<u32> for AttributeTitle {
    fn from(number: u32) -> Self {
        AttributeTitle::Number(number)
    }
}

/// Typed value of a single attribute entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Int(u32),
    /// Timestamps are stored as raw u32 the same way ints are.
    Time(u32),
    Real(f64),
    String(String),
}

/// One entry of an attribute record. Entries of multi-valued records carry
/// their own titles; the single entry of a simple record usually has none.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEntry {
    pub title: Option<AttributeTitle>,
    pub value: AttributeValue,
}

/// A named attribute record attached to a node, a material or the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub title: AttributeTitle,
    pub entries: Vec<AttributeEntry>,
}

impl Attribute {
    /// Record with one untitled entry, the most common shape.
    pub fn single(title: impl Into<AttributeTitle>, value: AttributeValue) -> Self {
        Self {
            title: title.into(),
            entries: vec![AttributeEntry { title: None, value }],
        }
    }

    /// Record with several titled entries.
    pub fn multi(
        title: impl Into<AttributeTitle>,
        entries: impl IntoIterator<Item = (AttributeTitle, AttributeValue)>,
    ) -> Self {
        Self {
            title: title.into(),
            entries: entries
                .into_iter()
                .map(|(title, value)| AttributeEntry {
                    title: Some(title),
                    value,
                })
                .collect(),
        }
    }
}

/// Physical material properties a kernel may attach to a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialProperties {
    pub name: Option<String>,
    /// Density in source units; `None` when the source marks it unset.
    pub density: Option<f64>,
}
