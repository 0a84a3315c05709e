//! Course catalog: seeded records with filter, sort, and pagination.
//!
//! Reads load an immutable snapshot; instructor edits swap in a new one.
//! Catalog edits live in memory only and do not survive a restart.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::seed;
use super::StoreError;

/// Fixed page size for catalog queries.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Video,
    Quiz,
    Exercise,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    /// Display duration, e.g. "12:30"
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// 1-5
    pub rating: u8,
    pub comment: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    /// Unique, URL-safe
    pub slug: String,
    pub title: String,
    pub description: String,
    /// ETH; zero means free
    pub price_eth: f64,
    /// 0-5
    pub rating: f64,
    pub students: u64,
    pub category: String,
    pub difficulty: Difficulty,
    pub modules: Vec<Module>,
    pub reviews: Vec<Review>,
    pub created_at: String,
}

impl Course {
    pub fn is_free(&self) -> bool {
        self.price_eth == 0.0
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseSort {
    /// Seed order already is newest-first; sorting by it is a no-op
    Newest,
    Popular,
    PriceLow,
    PriceHigh,
    Rating,
}

impl CourseSort {
    /// Unknown keys map to `None`: the filtered order is left untouched.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "popular" => Some(Self::Popular),
            "price-low" => Some(Self::PriceLow),
            "price-high" => Some(Self::PriceHigh),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}

/// Catalog query parameters; all filters are optional and independent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub sort: Option<String>,
    /// 1-based page number
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoursePage {
    pub courses: Vec<Course>,
    pub total_pages: usize,
}

/// Fields an instructor may change on an existing course.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_eth: Option<f64>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub modules: Option<Vec<Module>>,
}

pub struct CourseCatalog {
    snapshot: ArcSwap<Vec<Course>>,
    /// Serializes writers; readers never block
    write_lock: Mutex<()>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(courses),
            write_lock: Mutex::new(()),
        }
    }

    /// Catalog pre-populated with the built-in course set.
    pub fn with_seed() -> Self {
        Self::new(seed::seed_courses())
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Course> {
        self.snapshot.load().iter().find(|c| c.id == id).cloned()
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<Course> {
        self.snapshot.load().iter().find(|c| c.slug == slug).cloned()
    }

    /// Filter, sort, and paginate the catalog. Always succeeds; a page past
    /// the end is an empty list.
    pub fn query(&self, query: &CourseQuery) -> CoursePage {
        let snapshot = self.snapshot.load();

        let mut courses: Vec<Course> = snapshot
            .iter()
            .filter(|c| match &query.category {
                Some(category) => c.category.eq_ignore_ascii_case(category),
                None => true,
            })
            .filter(|c| match &query.search {
                Some(term) => {
                    let term = term.to_lowercase();
                    c.title.to_lowercase().contains(&term)
                        || c.description.to_lowercase().contains(&term)
                }
                None => true,
            })
            .filter(|c| match query.difficulty {
                Some(difficulty) => c.difficulty == difficulty,
                None => true,
            })
            .cloned()
            .collect();

        match query.sort.as_deref().and_then(CourseSort::parse) {
            Some(CourseSort::Newest) | None => {}
            Some(CourseSort::Popular) => courses.sort_by(|a, b| b.students.cmp(&a.students)),
            Some(CourseSort::PriceLow) => {
                courses.sort_by(|a, b| a.price_eth.total_cmp(&b.price_eth))
            }
            Some(CourseSort::PriceHigh) => {
                courses.sort_by(|a, b| b.price_eth.total_cmp(&a.price_eth))
            }
            Some(CourseSort::Rating) => courses.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }

        let total_pages = courses.len().div_ceil(PAGE_SIZE);
        let page = query.page.unwrap_or(1).max(1);
        let courses = courses
            .into_iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect();

        CoursePage {
            courses,
            total_pages,
        }
    }

    /// Add a course. Slugs must be unique across the catalog.
    pub fn create(&self, course: Course) -> Result<Course, StoreError> {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load_full();
        if current.iter().any(|c| c.slug == course.slug) {
            return Err(StoreError::DuplicateSlug(course.slug));
        }
        let mut next = (*current).clone();
        next.push(course.clone());
        self.snapshot.store(Arc::new(next));
        tracing::info!(slug = %course.slug, "Course added to catalog");
        Ok(course)
    }

    /// Apply an instructor edit to an existing course.
    pub fn update(&self, id: &str, update: CourseUpdate) -> Result<Course, StoreError> {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load_full();
        let mut next = (*current).clone();
        let course = next
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::CourseNotFound(id.to_string()))?;

        if let Some(title) = update.title {
            course.title = title;
        }
        if let Some(description) = update.description {
            course.description = description;
        }
        if let Some(price_eth) = update.price_eth {
            course.price_eth = price_eth;
        }
        if let Some(category) = update.category {
            course.category = category;
        }
        if let Some(difficulty) = update.difficulty {
            course.difficulty = difficulty;
        }
        if let Some(modules) = update.modules {
            course.modules = modules;
        }

        let updated = course.clone();
        self.snapshot.store(Arc::new(next));
        Ok(updated)
    }

    /// Append a review to a course.
    pub fn add_review(&self, id: &str, review: Review) -> Result<Course, StoreError> {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load_full();
        let mut next = (*current).clone();
        let course = next
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::CourseNotFound(id.to_string()))?;
        course.reviews.push(review);
        let updated = course.clone();
        self.snapshot.store(Arc::new(next));
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CourseCatalog {
        CourseCatalog::with_seed()
    }

    #[test]
    fn test_category_filter_returns_only_that_category() {
        let catalog = catalog();
        for category in ["defi", "development", "blockchain"] {
            let page = catalog.query(&CourseQuery {
                category: Some(category.to_string()),
                ..CourseQuery::default()
            });
            assert!(!page.courses.is_empty(), "no courses in {}", category);
            assert!(page.courses.iter().all(|c| c.category == category));
        }
    }

    #[test]
    fn test_price_low_sorts_non_decreasing() {
        let page = catalog().query(&CourseQuery {
            sort: Some("price-low".to_string()),
            ..CourseQuery::default()
        });
        let prices: Vec<f64> = page.courses.iter().map(|c| c.price_eth).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]), "{:?}", prices);
    }

    #[test]
    fn test_price_high_sorts_non_increasing() {
        let page = catalog().query(&CourseQuery {
            sort: Some("price-high".to_string()),
            ..CourseQuery::default()
        });
        let prices: Vec<f64> = page.courses.iter().map(|c| c.price_eth).collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]), "{:?}", prices);
    }

    #[test]
    fn test_popular_sorts_by_students_desc() {
        let page = catalog().query(&CourseQuery {
            sort: Some("popular".to_string()),
            ..CourseQuery::default()
        });
        let students: Vec<u64> = page.courses.iter().map(|c| c.students).collect();
        assert!(students.windows(2).all(|w| w[0] >= w[1]), "{:?}", students);
    }

    #[test]
    fn test_unknown_sort_leaves_filtered_order() {
        let catalog = catalog();
        let unsorted = catalog.query(&CourseQuery::default());
        let bogus = catalog.query(&CourseQuery {
            sort: Some("bogus-key".to_string()),
            ..CourseQuery::default()
        });
        let ids =
            |page: &CoursePage| page.courses.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&unsorted), ids(&bogus));
    }

    #[test]
    fn test_search_matches_title_and_description_case_insensitive() {
        let page = catalog().query(&CourseQuery {
            search: Some("SOLIDITY".to_string()),
            ..CourseQuery::default()
        });
        assert!(!page.courses.is_empty());
        for c in &page.courses {
            let haystack = format!("{} {}", c.title, c.description).to_lowercase();
            assert!(haystack.contains("solidity"));
        }
    }

    #[test]
    fn test_query_is_deterministic() {
        let catalog = catalog();
        let query = CourseQuery {
            difficulty: Some(Difficulty::Beginner),
            sort: Some("rating".to_string()),
            ..CourseQuery::default()
        };
        let a: Vec<String> = catalog.query(&query).courses.iter().map(|c| c.id.clone()).collect();
        let b: Vec<String> = catalog.query(&query).courses.iter().map(|c| c.id.clone()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pagination_and_page_past_end() {
        let catalog = catalog();
        let total = catalog.len();
        let page1 = catalog.query(&CourseQuery::default());
        assert!(page1.courses.len() <= PAGE_SIZE);
        assert_eq!(page1.total_pages, total.div_ceil(PAGE_SIZE));

        let beyond = catalog.query(&CourseQuery {
            page: Some(99),
            ..CourseQuery::default()
        });
        assert!(beyond.courses.is_empty());
        assert_eq!(beyond.total_pages, page1.total_pages);
    }

    #[test]
    fn test_filters_then_empty_result_is_ok() {
        let page = catalog().query(&CourseQuery {
            category: Some("no-such-category".to_string()),
            ..CourseQuery::default()
        });
        assert!(page.courses.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_create_rejects_duplicate_slug() {
        let catalog = catalog();
        let existing = catalog.get("1").unwrap();
        let mut copy = existing.clone();
        copy.id = "999".to_string();
        let err = catalog.create(copy).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug(_)));
    }

    #[test]
    fn test_update_changes_only_provided_fields() {
        let catalog = catalog();
        let before = catalog.get("1").unwrap();
        let after = catalog
            .update(
                "1",
                CourseUpdate {
                    price_eth: Some(0.25),
                    ..CourseUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(after.price_eth, 0.25);
        assert_eq!(after.title, before.title);
        assert_eq!(catalog.get("1").unwrap().price_eth, 0.25);
    }

    #[test]
    fn test_add_review_appends() {
        let catalog = catalog();
        let before = catalog.get("1").unwrap().reviews.len();
        let after = catalog
            .add_review(
                "1",
                Review {
                    rating: 5,
                    comment: "Great intro".to_string(),
                    date: "2025-01-10T00:00:00Z".to_string(),
                },
            )
            .unwrap();
        assert_eq!(after.reviews.len(), before + 1);
    }
}
