//! Data models for the topic document
//!
//! The fetch service hands back opaque bytes; this module is the decoding
//! step that turns them into [`TopicRecord`]s, plus the name/description
//! split used when presenting a record.

use serde::{Deserialize, Serialize};

use crate::constants::topics::NAME_DESCRIPTION_DELIMITER;
use crate::errors::DecodeResult;

/// Icon sub-object of a topic entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Icon {
    /// Image path relative to the image base host (may be empty)
    #[serde(rename = "URL", default)]
    pub url: String,
}

/// One entry of the topic list
///
/// Equality and hashing cover every field, which is what deduplication keys
/// on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Free text of the form `"<name> - <description>"`
    #[serde(rename = "Text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Associated image
    #[serde(rename = "Icon", default)]
    pub icon: Icon,
    /// Link to the topic's page
    #[serde(rename = "FirstURL", default, skip_serializing_if = "Option::is_none")]
    pub first_url: Option<String>,
    /// Pre-rendered HTML snippet
    #[serde(rename = "Result", default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Category name, present only on grouping entries
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Nested entries of a grouping entry
    #[serde(rename = "Topics", default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<TopicRecord>,
}

impl TopicRecord {
    /// Create a record from its text and icon path
    pub fn new(text: impl Into<String>, icon_url: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            icon: Icon {
                url: icon_url.into(),
            },
            ..Default::default()
        }
    }

    /// Display name and description derived from the free text
    pub fn name_and_description(&self) -> (Option<String>, Option<String>) {
        extract_name_and_description(self.text.as_deref())
    }

    /// Relative image path to hand to the image service
    pub fn image_path(&self) -> &str {
        &self.icon.url
    }

    /// Whether this entry only groups other entries
    pub fn is_group(&self) -> bool {
        self.text.is_none() && !self.topics.is_empty()
    }
}

/// Decoded topic document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDocument {
    /// Topic entries in server order, duplicates included
    #[serde(rename = "RelatedTopics", default)]
    pub related_topics: Vec<TopicRecord>,
}

impl TopicDocument {
    /// Decode a document from raw payload bytes
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Json` if the bytes are not a valid document
    pub fn from_slice(bytes: &[u8]) -> DecodeResult<Self> {
        let document = serde_json::from_slice(bytes)?;
        Ok(document)
    }

    /// Topic records in order, with grouping entries replaced by their members
    pub fn into_records(self) -> Vec<TopicRecord> {
        let mut records = Vec::with_capacity(self.related_topics.len());
        for record in self.related_topics {
            if record.is_group() {
                records.extend(record.topics);
            } else {
                records.push(record);
            }
        }
        records
    }
}

/// Split free text into a display name and description
///
/// The text is split on every `" - "`: the first piece is the name and the
/// second the description, both trimmed. Later pieces are dropped. Text
/// without the delimiter is all name. Absent text yields neither.
pub fn extract_name_and_description(input: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(input) = input else {
        return (None, None);
    };

    let mut pieces = input.split(NAME_DESCRIPTION_DELIMITER).map(str::trim);
    let name = pieces.next().map(str::to_string);
    let description = pieces.next().map(str::to_string);
    (name, description)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DOCUMENT: &str = r#"{
        "Abstract": "",
        "RelatedTopics": [
            {
                "FirstURL": "https://duckduckgo.com/Apu_Nahasapeemapetilon",
                "Icon": {"Height": "", "URL": "/i/99b04638.png", "Width": ""},
                "Result": "<a href=\"...\">Apu Nahasapeemapetilon</a>",
                "Text": "Apu Nahasapeemapetilon - Apu Nahasapeemapetilon is a recurring character."
            },
            {
                "Icon": {"URL": ""},
                "Text": "Barney Gumble"
            },
            {
                "Name": "Family",
                "Topics": [
                    {"Icon": {"URL": "/i/bart.png"}, "Text": "Bart Simpson - Eldest child"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_decode_document() {
        let document = TopicDocument::from_slice(SAMPLE_DOCUMENT.as_bytes()).unwrap();
        assert_eq!(document.related_topics.len(), 3);

        let apu = &document.related_topics[0];
        assert_eq!(apu.image_path(), "/i/99b04638.png");
        assert_eq!(
            apu.first_url.as_deref(),
            Some("https://duckduckgo.com/Apu_Nahasapeemapetilon")
        );
        assert!(document.related_topics[2].is_group());
    }

    #[test]
    fn test_into_records_flattens_groups() {
        let records = TopicDocument::from_slice(SAMPLE_DOCUMENT.as_bytes())
            .unwrap()
            .into_records();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[2].name_and_description(),
            (
                Some("Bart Simpson".to_string()),
                Some("Eldest child".to_string())
            )
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(TopicDocument::from_slice(b"<html></html>").is_err());
    }

    #[test]
    fn test_decode_empty_object() {
        let document = TopicDocument::from_slice(b"{}").unwrap();
        assert!(document.related_topics.is_empty());
    }

    #[test]
    fn test_name_and_description_split() {
        assert_eq!(
            extract_name_and_description(Some("Alice - A brave knight")),
            (Some("Alice".to_string()), Some("A brave knight".to_string()))
        );
        assert_eq!(
            extract_name_and_description(Some("Bob")),
            (Some("Bob".to_string()), None)
        );
        assert_eq!(extract_name_and_description(None), (None, None));
    }

    #[test]
    fn test_split_keeps_first_two_pieces() {
        assert_eq!(
            extract_name_and_description(Some("  Carol  -   Mayor - of Springfield ")),
            (Some("Carol".to_string()), Some("Mayor".to_string()))
        );
        assert_eq!(
            extract_name_and_description(Some("Dana - ")),
            (Some("Dana".to_string()), Some(String::new()))
        );
        // Hyphen without surrounding spaces is not the delimiter
        assert_eq!(
            extract_name_and_description(Some("Jean-Luc")),
            (Some("Jean-Luc".to_string()), None)
        );
    }

    #[test]
    fn test_record_equality_covers_all_fields() {
        let a = TopicRecord::new("Alice - knight", "/i/a.png");
        let mut b = a.clone();
        assert_eq!(a, b);

        b.icon.url = "/i/other.png".to_string();
        assert_ne!(a, b);
    }
}
