use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Insertion-ordered set of trimmed, non-blank tags. Matching is exact and
/// case-sensitive, so `"a"` and `"A"` are distinct tags. Stored arrays may
/// be `null` or hold `null` entries; both are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<Option<String>>>", into = "Vec<String>")]
pub struct TagSet(IndexSet<String>);

impl TagSet {
    pub fn normalized<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = IndexSet::new();
        for tag in tags {
            let value = tag.as_ref().trim();
            if !value.is_empty() {
                set.insert(value.to_string());
            }
        }
        Self(set)
    }

    pub fn with(&self, tag: &str) -> Self {
        Self::normalized(self.0.iter().map(String::as_str).chain(std::iter::once(tag)))
    }

    pub fn without(&self, tag: &str) -> Self {
        Self(self.0.iter().filter(|current| *current != tag).cloned().collect())
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl From<Option<Vec<Option<String>>>> for TagSet {
    fn from(value: Option<Vec<Option<String>>>) -> Self {
        Self::normalized(value.unwrap_or_default().into_iter().flatten())
    }
}

impl From<TagSet> for Vec<String> {
    fn from(value: TagSet) -> Self {
        value.0.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::TagSet;

    #[test]
    fn normalization_strips_blanks_and_exact_duplicates() {
        let tags = TagSet::normalized(["a", "A", "a ", ""]);
        assert_eq!(tags.to_vec(), vec!["a".to_string(), "A".to_string()]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = TagSet::normalized([" work ", "draft", "work", "   "]);
        let twice = TagSet::normalized(once.to_vec());
        assert_eq!(once.to_vec(), twice.to_vec());
        assert_eq!(once.to_vec(), vec!["work".to_string(), "draft".to_string()]);
    }

    #[test]
    fn with_and_without_keep_order() {
        let tags = TagSet::normalized(["png", "holiday"]);
        let added = tags.with(" beach ").with("png");
        assert_eq!(added.to_vec(), vec!["png", "holiday", "beach"]);

        let removed = added.without("holiday");
        assert_eq!(removed.to_vec(), vec!["png", "beach"]);
        assert_eq!(removed.first(), Some("png"));
        assert!(!removed.contains("holiday"));
    }

    #[test]
    fn deserializing_dirty_arrays_normalizes() {
        let tags: TagSet = serde_json::from_str(r#"["x"," x","","y"]"#).expect("tags");
        assert_eq!(tags.len(), 2);
        assert_eq!(serde_json::to_string(&tags).expect("json"), r#"["x","y"]"#);
    }

    #[test]
    fn null_entries_and_null_arrays_load_as_missing_tags() {
        let tags: TagSet = serde_json::from_str(r#"["png",null,"  "]"#).expect("tags");
        assert_eq!(tags.to_vec(), vec!["png"]);

        let none: TagSet = serde_json::from_str("null").expect("null tags");
        assert!(none.is_empty());
    }
}
