//! Typed calls for each REST resource.
//!
//! Every list call returns the named array from the server's envelope,
//! defaulting to empty when the field is missing or `null`.

mod courses;
mod files;
mod questions;
mod spaces;
mod users;

pub use courses::CourseQuery;
pub use questions::SubmitError;

/// Percent-encode one path segment.
pub(crate) fn seg(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
