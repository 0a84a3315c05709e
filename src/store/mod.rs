//! Domain state for the platform.
//!
//! Four independent stores back the UI: the user registry, the course
//! catalog, enrollment progress, and the simulated wallet (plus the
//! certificate records the wallet mints). None of them call into each
//! other; the API layer composes them. Mutations take short synchronous
//! locks, so no partial update is ever observable.

mod catalog;
mod certificates;
mod enrollments;
mod persist;
mod seed;
mod users;
mod wallet;

pub use catalog::{
    Course, CourseCatalog, CoursePage, CourseQuery, CourseSort, CourseUpdate, Difficulty, Lesson,
    LessonKind, Module, Review, PAGE_SIZE,
};
pub use certificates::{Certificate, CertificateStore};
pub use enrollments::{CourseProgress, Enrollment, EnrollmentStore};
pub use persist::{Documents, AUTH_STORAGE, WEB3_STORAGE};
pub use users::{Role, User, UserStore, COURSE_REWARD_TOKENS};
pub use wallet::{TxRecord, TxStatus, WalletSimulator, WalletSnapshot, WalletState};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("course not found: {0}")]
    CourseNotFound(String),
    #[error("a course with slug '{0}' already exists")]
    DuplicateSlug(String),
    #[error("certificate not found: {0}")]
    CertificateNotFound(String),
    #[error("wallet is not connected")]
    WalletNotConnected,
    #[error("failed to hash password")]
    PasswordHash,
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Chain(#[from] crate::chain::ChainError),
}
