//! Selects posts from a timeline according to a [`Query`] of optional
//! criteria. This is the calling layer for the date-range matcher: a
//! query's `date` field holds a date-range expression and every post's
//! date is tested against it under one shared reference instant, so the
//! whole selection is internally consistent even while wall-clock time
//! advances.

use crate::clock::Clock;
use crate::expr;
use crate::matcher::Matcher;
use crate::post::{Kind, Post};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// Which post kinds a query selects from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[serde(alias = "post")]
    Posts,

    #[serde(alias = "page")]
    Pages,

    All,
}

impl Default for KindFilter {
    fn default() -> Self {
        KindFilter::Posts
    }
}

impl KindFilter {
    fn admits(&self, kind: Kind) -> bool {
        match self {
            KindFilter::Posts => kind == Kind::Post,
            KindFilter::Pages => kind == Kind::Page,
            KindFilter::All => true,
        }
    }
}

/// A bag of optional selection criteria. Every field defaults to "no
/// constraint", so an empty query returns the whole timeline of posts,
/// newest first.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Which kinds to select from: `posts` (the default), `pages`, or
    /// `all`.
    #[serde(rename = "type")]
    pub kind: KindFilter,

    /// Tags to match. By default a post sharing any listed tag is
    /// admitted; with `require_all_tags` the post must carry every
    /// listed tag.
    pub tags: Vec<String>,

    pub require_all_tags: bool,

    /// Categories to match, case-insensitively.
    pub categories: Vec<String>,

    /// Sections to match, case-insensitively.
    pub sections: Vec<String>,

    /// When non-empty, only posts with one of these slugs survive. This
    /// is applied to the sliced window, after `start`/`stop`.
    pub slugs: Vec<String>,

    /// A date-range expression each post's date must satisfy.
    pub date: Option<String>,

    /// A metadata key to sort by instead of the date ordering. Every
    /// selected post must carry the key.
    pub sort: Option<String>,

    /// Reverses the sliced window.
    pub reverse: bool,

    /// The first index of the window into the filtered timeline.
    pub start: Option<usize>,

    /// The index one past the end of the window.
    pub stop: Option<usize>,

    /// A source path to exclude, so a post embedding a query does not
    /// list itself.
    pub exclude_source: Option<PathBuf>,
}

/// Applies [`Query`]s to timelines of posts.
pub struct Filter<'a> {
    /// The current-time source handed to the date-range matcher.
    clock: &'a dyn Clock,
}

impl<'a> Filter<'a> {
    /// Constructs a filter over the given clock.
    pub fn new(clock: &'a dyn Clock) -> Filter<'a> {
        Filter { clock }
    }

    /// Selects the posts matching `query` from `posts`. Criteria are
    /// applied in a fixed order: kind, excluded source, categories,
    /// sections, tags, sort, date range, then the `start`/`stop` window,
    /// `reverse`, and finally `slugs`.
    pub fn apply<'p>(&self, query: &Query, posts: &'p [Post]) -> Result<Vec<&'p Post>> {
        let mut timeline: Vec<&Post> = posts
            .iter()
            .filter(|post| query.kind.admits(post.kind))
            .collect();
        timeline.sort_by(|a, b| b.date.cmp(&a.date));

        if let Some(exclude) = &query.exclude_source {
            timeline.retain(|post| post.source_path.as_deref() != Some(exclude.as_path()));
        }

        if !query.categories.is_empty() {
            let categories: Vec<String> = query
                .categories
                .iter()
                .map(|c| c.trim().to_lowercase())
                .collect();
            timeline.retain(|post| categories.contains(&post.category.to_lowercase()));
        }

        if !query.sections.is_empty() {
            let sections: Vec<String> = query
                .sections
                .iter()
                .map(|s| s.trim().to_lowercase())
                .collect();
            timeline.retain(|post| sections.contains(&post.section.to_lowercase()));
        }

        if !query.tags.is_empty() {
            let tags: HashSet<String> = query.tags.iter().map(|t| slug::slugify(t)).collect();
            timeline.retain(|post| {
                if query.require_all_tags {
                    tags.is_subset(&post.tags)
                } else {
                    !tags.is_disjoint(&post.tags)
                }
            });
        }

        if let Some(key) = &query.sort {
            for post in &timeline {
                if !post.meta.contains_key(key) {
                    return Err(Error::MissingSortKey {
                        key: key.clone(),
                        slug: post.slug.clone(),
                    });
                }
            }
            timeline.sort_by(|a, b| a.meta.get(key).cmp(&b.meta.get(key)));
        }

        if let Some(range) = &query.date {
            // One reference instant for the whole selection.
            let now = self.clock.now();
            let matcher = Matcher::new(self.clock);
            let mut kept = Vec::with_capacity(timeline.len());
            for post in timeline {
                if matcher.matches(range, &post.date, Some(now))? {
                    kept.push(post);
                }
            }
            timeline = kept;
        }

        let start = query.start.unwrap_or(0).min(timeline.len());
        let stop = query.stop.unwrap_or_else(|| timeline.len()).min(timeline.len());
        let mut window: Vec<&Post> = if start < stop {
            timeline[start..stop].to_vec()
        } else {
            Vec::new()
        };
        if query.reverse {
            window.reverse();
        }

        if !query.slugs.is_empty() {
            window.retain(|post| query.slugs.iter().any(|wanted| wanted.trim() == post.slug));
        }

        Ok(window)
    }
}

/// Represents the result of applying a query.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error applying a query.
#[derive(Debug)]
pub enum Error {
    /// The query's date-range expression is malformed.
    DateRange(expr::Error),

    /// A selected post is missing the requested sort key.
    MissingSortKey { key: String, slug: String },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DateRange(err) => err.fmt(f),
            Error::MissingSortKey { key, slug } => {
                write!(f, "post `{}` has no `{}` metadata to sort by", slug, key)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DateRange(err) => Some(err),
            Error::MissingSortKey { .. } => None,
        }
    }
}

impl From<expr::Error> for Error {
    /// Converts expression errors into [`Error`]. This allows us to use
    /// the `?` operator around the date-range matcher.
    fn from(err: expr::Error) -> Error {
        Error::DateRange(err)
    }
}
