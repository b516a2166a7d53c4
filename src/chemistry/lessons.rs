use crate::chemistry::storage::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// One lesson of the knowledge center. `content` is markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub category: String,
    pub level: LessonLevel,
    pub content: String,
    #[serde(default)]
    pub exercises: Vec<String>,
}

impl Lesson {
    /// `needle` must already be lower case
    fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}

/// Category name meaning "no category filter"
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Default)]
pub struct LessonStore {
    lessons: Vec<Lesson>,
}

impl LessonStore {
    pub fn new(mut lessons: Vec<Lesson>) -> Result<Self, StoreError> {
        let mut seen = HashSet::new();
        for lesson in &lessons {
            if !seen.insert(lesson.id) {
                return Err(StoreError::DuplicateLesson(lesson.id));
            }
        }
        lessons.sort_by_key(|lesson| lesson.id);
        Ok(Self { lessons })
    }

    pub fn all(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn get(&self, id: u32) -> Option<&Lesson> {
        self.lessons
            .binary_search_by_key(&id, |lesson| lesson.id)
            .ok()
            .map(|index| &self.lessons[index])
    }

    /// Case-insensitive text search over title, description and category, optionally
    /// restricted to one category. Blank terms and the "All" category do not filter.
    pub fn search(&self, term: Option<&str>, category: Option<&str>) -> Vec<&Lesson> {
        let needle = term
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES));

        self.lessons
            .iter()
            .filter(|lesson| needle.as_deref().is_none_or(|n| lesson.mentions(n)))
            .filter(|lesson| category.is_none_or(|c| lesson.category.eq_ignore_ascii_case(c)))
            .collect()
    }

    /// distinct categories in the order they first appear
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for lesson in &self.lessons {
            if !categories.contains(&lesson.category.as_str()) {
                categories.push(&lesson.category);
            }
        }
        categories
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}
