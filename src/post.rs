//! Defines the [`Post`] metadata record the filtering layer queries.
//! Posts are typically deserialized from frontmatter-shaped YAML; the
//! surrounding site generator owns the bodies, templates, and output
//! tree, none of which matter here.

use crate::datetime;
use chrono::NaiveDateTime;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Whether a record is a post (appears in feeds and indices) or a
/// standalone page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Post,
    Page,
}

impl Default for Kind {
    fn default() -> Self {
        Kind::Post
    }
}

/// The metadata for one post.
#[derive(Clone, Debug, Deserialize)]
pub struct Post {
    /// The title of the post.
    #[serde(rename = "Title")]
    pub title: String,

    /// The post's slug, unique within the timeline.
    #[serde(rename = "Slug")]
    pub slug: String,

    /// The date of the post. Accepts the same forms as date-range
    /// expression values; a date without a time of day is promoted to
    /// midnight.
    #[serde(rename = "Date", deserialize_with = "deserialize_date")]
    pub date: NaiveDateTime,

    /// The tags associated with the post, slugified so that e.g. `macOS`
    /// and `MacOS` resolve to the same tag.
    #[serde(default, rename = "Tags", deserialize_with = "deserialize_tags")]
    pub tags: HashSet<String>,

    #[serde(default, rename = "Category")]
    pub category: String,

    #[serde(default, rename = "Section")]
    pub section: String,

    #[serde(default, rename = "Kind")]
    pub kind: Kind,

    /// The source file the post was parsed from, when known. Used to
    /// keep a post out of its own query results.
    #[serde(default, rename = "Source")]
    pub source_path: Option<PathBuf>,

    /// Free-form metadata. Sort keys for queries live here.
    #[serde(default, rename = "Meta")]
    pub meta: BTreeMap<String, String>,
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    datetime::parse(&text).map_err(|e| D::Error::custom(format!("{}", e)))
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Vec::<String>::deserialize(deserializer)?;
    Ok(tags.iter().map(|t| slug::slugify(t)).collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_deserialize_post() -> Result<(), serde_yaml::Error> {
        let post: Post = serde_yaml::from_str(
            r#"
Title: Hello, world!
Slug: hello-world
Date: 2021-04-16
Tags: [Rust Programming, greet]
Category: general
"#,
        )?;
        assert_eq!("Hello, world!", post.title);
        assert_eq!("hello-world", post.slug);
        assert_eq!(
            NaiveDate::from_ymd(2021, 4, 16).and_hms(0, 0, 0),
            post.date,
        );
        assert!(post.tags.contains("rust-programming"));
        assert!(post.tags.contains("greet"));
        assert_eq!("general", post.category);
        assert_eq!(Kind::Post, post.kind);
        assert_eq!(None, post.source_path);
        Ok(())
    }

    #[test]
    fn test_deserialize_page_with_full_date() -> Result<(), serde_yaml::Error> {
        let post: Post = serde_yaml::from_str(
            r#"
Title: About
Slug: about
Date: 2021-04-16 09:30:00
Kind: page
"#,
        )?;
        assert_eq!(Kind::Page, post.kind);
        assert_eq!(
            NaiveDate::from_ymd(2021, 4, 16).and_hms(9, 30, 0),
            post.date,
        );
        Ok(())
    }

    #[test]
    fn test_deserialize_rejects_bad_date() {
        let result: Result<Post, _> = serde_yaml::from_str(
            r#"
Title: Bad
Slug: bad
Date: not a date
"#,
        );
        assert!(result.is_err());
    }
}
