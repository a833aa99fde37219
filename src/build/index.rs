//! The site index: one summary entry per rendered post, newest first.

use serde::Serialize;

use super::date::PostDate;
use super::document::Document;

/// A post summary as it appears in the index and the feed.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub title: String,
    pub url: String,
    pub slug: String,
    pub date: PostDate,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl IndexEntry {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            title: doc.title(),
            url: doc.url_path.clone(),
            slug: doc.slug.clone(),
            date: doc.date(),
            tags: doc.front_matter.tags.clone(),
            description: doc.front_matter.description.clone(),
        }
    }
}

/// The full site index, rebuilt from scratch on every run.
#[derive(Debug, Default)]
pub struct SiteIndex {
    entries: Vec<IndexEntry>,
}

impl SiteIndex {
    /// Build the index from the successfully rendered documents.
    ///
    /// Entries are ordered by date descending; the slug breaks ties so the
    /// ordering is total and repeated runs produce identical output.
    pub fn from_documents<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut entries: Vec<IndexEntry> =
            docs.into_iter().map(IndexEntry::from_document).collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        Self { entries }
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::build::document::parse_front_matter;

    fn doc(name: &str, date: &str) -> Document {
        let source = format!("---\ndate: {date}\n---\n\nBody\n");
        let parsed = parse_front_matter(&source).unwrap();
        Document::new(
            PathBuf::from(format!("{name}.md")),
            parsed.front_matter,
            parsed.content,
        )
    }

    #[test]
    fn test_ordered_by_date_descending() {
        let docs = vec![
            doc("oldest", "2022-03-01"),
            doc("newest", "2024-06-15"),
            doc("middle", "2023-11-20"),
        ];
        let index = SiteIndex::from_documents(&docs);

        let slugs: Vec<_> = index.entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_equal_dates_tie_break_on_slug() {
        let docs = vec![doc("beta", "2024-01-01"), doc("alpha", "2024-01-01")];
        let index = SiteIndex::from_documents(&docs);

        let slugs: Vec<_> = index.entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_empty_index() {
        let index = SiteIndex::from_documents(&[]);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_entry_carries_summary_fields() {
        let source = "---\ntitle: Composition Over Configuration\ndate: 2024-06-15\ntags: [design]\ndescription: Why wiring beats switches\n---\n\nBody\n";
        let parsed = parse_front_matter(source).unwrap();
        let doc = Document::new(
            PathBuf::from("composition.md"),
            parsed.front_matter,
            parsed.content,
        );

        let index = SiteIndex::from_documents([&doc]);
        let entry = &index.entries()[0];

        assert_eq!(entry.title, "Composition Over Configuration");
        assert_eq!(entry.url, "/2024/06/composition");
        assert_eq!(entry.tags, vec!["design"]);
        assert_eq!(
            entry.description.as_deref(),
            Some("Why wiring beats switches")
        );
    }
}
