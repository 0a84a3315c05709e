//! Enrollment records and per-course lesson progress.
//!
//! Progress lives in process memory only and is rebuilt from scratch after
//! a restart. Records are created lazily on first read.

use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;

/// Percent is computed against this fixed denominator, independent of the
/// course's actual lesson count.
const PROGRESS_DENOMINATOR: u32 = 10;

/// Minutes credited to time-spent on every lesson-complete call.
const TIME_INCREMENT_MINUTES: u64 = 15;

#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
    pub id: String,
    pub course_id: String,
    pub user_id: String,
    pub enrolled_at: String,
    pub last_accessed: String,
    pub percent: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseProgress {
    pub course_id: String,
    pub percent: u32,
    pub completed_lessons: Vec<String>,
    pub time_spent_minutes: u64,
    pub last_accessed: String,
}

impl CourseProgress {
    fn new(course_id: &str) -> Self {
        Self {
            course_id: course_id.to_string(),
            percent: 0,
            completed_lessons: Vec::new(),
            time_spent_minutes: 0,
            last_accessed: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Default)]
pub struct EnrollmentStore {
    /// (user id, course id) -> enrollment
    enrollments: DashMap<(String, String), Enrollment>,
    /// (user id, course id) -> progress
    progress: DashMap<(String, String), CourseProgress>,
}

impl EnrollmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an enrollment. One record per (user, course) pair; repeat
    /// calls return the existing record.
    pub fn enroll(&self, user_id: &str, course_id: &str) -> Enrollment {
        let key = (user_id.to_string(), course_id.to_string());
        self.enrollments
            .entry(key)
            .or_insert_with(|| {
                let now = Utc::now().to_rfc3339();
                Enrollment {
                    id: uuid::Uuid::new_v4().to_string(),
                    course_id: course_id.to_string(),
                    user_id: user_id.to_string(),
                    enrolled_at: now.clone(),
                    last_accessed: now,
                    percent: 0,
                    completed: false,
                }
            })
            .clone()
    }

    pub fn enrollment(&self, user_id: &str, course_id: &str) -> Option<Enrollment> {
        self.enrollments
            .get(&(user_id.to_string(), course_id.to_string()))
            .map(|e| e.clone())
    }

    pub fn enrollments_for(&self, user_id: &str) -> Vec<Enrollment> {
        let mut list: Vec<Enrollment> = self
            .enrollments
            .iter()
            .filter(|entry| entry.key().0 == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by(|a, b| a.enrolled_at.cmp(&b.enrolled_at));
        list
    }

    /// Progress for a course, created zeroed on first read.
    pub fn course_progress(&self, user_id: &str, course_id: &str) -> CourseProgress {
        let key = (user_id.to_string(), course_id.to_string());
        self.progress
            .entry(key)
            .or_insert_with(|| CourseProgress::new(course_id))
            .clone()
    }

    /// Mark a lesson complete. The lesson set insertion is idempotent, but
    /// percent is recomputed and the fixed time increment applied on every
    /// call.
    pub fn mark_lesson_complete(
        &self,
        user_id: &str,
        course_id: &str,
        lesson_id: &str,
    ) -> CourseProgress {
        let key = (user_id.to_string(), course_id.to_string());
        let mut entry = self
            .progress
            .entry(key.clone())
            .or_insert_with(|| CourseProgress::new(course_id));

        if !entry.completed_lessons.iter().any(|l| l == lesson_id) {
            entry.completed_lessons.push(lesson_id.to_string());
        }
        entry.percent =
            (entry.completed_lessons.len() as u32 * 100 / PROGRESS_DENOMINATOR).min(100);
        entry.time_spent_minutes += TIME_INCREMENT_MINUTES;
        entry.last_accessed = Utc::now().to_rfc3339();
        let snapshot = entry.clone();
        drop(entry);

        self.sync_enrollment(&key, snapshot.percent, false);
        snapshot
    }

    /// Force progress to 100 regardless of lesson completion.
    pub fn mark_course_complete(&self, user_id: &str, course_id: &str) -> CourseProgress {
        let key = (user_id.to_string(), course_id.to_string());
        let mut entry = self
            .progress
            .entry(key.clone())
            .or_insert_with(|| CourseProgress::new(course_id));
        entry.percent = 100;
        entry.last_accessed = Utc::now().to_rfc3339();
        let snapshot = entry.clone();
        drop(entry);

        self.sync_enrollment(&key, 100, true);
        snapshot
    }

    fn sync_enrollment(&self, key: &(String, String), percent: u32, completed: bool) {
        if let Some(mut enrollment) = self.enrollments.get_mut(key) {
            enrollment.percent = percent;
            enrollment.completed = enrollment.completed || completed;
            enrollment.last_accessed = Utc::now().to_rfc3339();
        }
    }
}
