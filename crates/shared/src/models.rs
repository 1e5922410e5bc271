//! Wire models for the spacedash REST API.
//!
//! The backend speaks PascalCase JSON. Collection fields default to empty so a
//! missing or `null` list never reaches the UI as anything but `[]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Identity ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Role {
    SystemAdmin,
    #[default]
    Member,
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("SystemAdmin") {
            Role::SystemAdmin
        } else {
            Role::Member
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::SystemAdmin => "SystemAdmin".to_string(),
            Role::Member => "Member".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl User {
    pub fn is_system_admin(&self) -> bool {
        matches!(self.role, Some(Role::SystemAdmin))
    }

    /// "First Last", falling back to the username.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            self.username.clone()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddMemberRequest {
    pub username: String,
}

// --- Pagination ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pagination {
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u32,
}

// --- Spaces ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpaceList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub spaces: Vec<Space>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpaceRequest {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
}

// --- Courses ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SectionRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<SectionRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CourseList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub courses: Vec<Course>,
    /// Computed by the server; the client never derives it.
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CourseRequest {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LessonRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lessons: Vec<LessonRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SectionList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SectionRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    /// HTML body as authored in the editor.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LessonList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LessonRequest {
    pub title: String,
    pub content: String,
}

// --- Files ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FileStatus {
    Active,
    Processing,
    Error,
    #[default]
    Unknown,
}

impl From<String> for FileStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "active" => FileStatus::Active,
            "processing" => FileStatus::Processing,
            "error" => FileStatus::Error,
            _ => FileStatus::Unknown,
        }
    }
}

impl From<FileStatus> for String {
    fn from(value: FileStatus) -> Self {
        match value {
            FileStatus::Active => "active",
            FileStatus::Processing => "processing",
            FileStatus::Error => "error",
            FileStatus::Unknown => "unknown",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpaceFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, rename = "Type")]
    pub file_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<SpaceFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// An AI-derived artifact attached to a file: either the text itself or a URL
/// the text must be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Artifact {
    Inline(String),
    Remote(String),
}

impl From<String> for Artifact {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if (trimmed.starts_with("https://") || trimmed.starts_with("http://"))
            && !trimmed.contains(char::is_whitespace)
        {
            Artifact::Remote(trimmed.to_string())
        } else {
            Artifact::Inline(value)
        }
    }
}

impl From<Artifact> for String {
    fn from(value: Artifact) -> Self {
        match value {
            Artifact::Inline(text) => text,
            Artifact::Remote(url) => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileDetail {
    #[serde(flatten)]
    pub file: SpaceFile,
    /// Presigned download URL.
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_items: Option<Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Artifact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadRequest {
    pub file_name: String,
    pub file_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadTicket {
    pub file_id: String,
    pub upload_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateFileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

// --- Question sets ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Question {
    pub sequence_number: u32,
    pub question: String,
    #[serde(rename = "OptionA")]
    pub option_a: String,
    #[serde(rename = "OptionB")]
    pub option_b: String,
    #[serde(rename = "OptionC")]
    pub option_c: String,
    #[serde(rename = "OptionD")]
    pub option_d: String,
}

impl Question {
    /// Options in display order, labelled A to D.
    pub fn options(&self) -> [(&'static str, &str); 4] {
        [
            ("A", self.option_a.as_str()),
            ("B", self.option_b.as_str()),
            ("C", self.option_c.as_str()),
            ("D", self.option_d.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionSet {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub space_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<Question>,
}

impl QuestionSet {
    /// Questions ordered by sequence number, which is the order answers are
    /// submitted in.
    pub fn ordered_questions(&self) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self.questions.iter().collect();
        questions.sort_by_key(|q| q.sequence_number);
        questions
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionSetList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question_sets: Vec<QuestionSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenerateQuestionsRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_questions: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmitAnswersRequest {
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestResult {
    pub sequence_number: u32,
    /// Answer key, e.g. "B".
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmitAnswersResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<TestResult>,
}

// --- Chat (client-only) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A message in an in-memory chat session. Never sent to the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub loading: bool,
}

// --- Trending feed (third-party, snake_case) ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleAuthor {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user: ArticleAuthor,
    #[serde(default)]
    pub positive_reactions_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_lists_become_empty() {
        let list: SpaceList = serde_json::from_str("{}").unwrap();
        assert!(list.spaces.is_empty());

        let list: FileList = serde_json::from_str(r#"{"Files": null}"#).unwrap();
        assert!(list.files.is_empty());

        let list: CourseList = serde_json::from_str(r#"{"TotalPages": 4}"#).unwrap();
        assert!(list.courses.is_empty());
        assert_eq!(list.total_pages, 4);
    }

    #[test]
    fn file_status_is_case_insensitive_with_unknown_fallback() {
        let file: SpaceFile = serde_json::from_str(
            r#"{"Id":"f1","Name":"a.pdf","Type":"application/pdf","Status":"PROCESSING"}"#,
        )
        .unwrap();
        assert_eq!(file.status, FileStatus::Processing);

        let file: SpaceFile =
            serde_json::from_str(r#"{"Id":"f2","Name":"b","Status":"queued"}"#).unwrap();
        assert_eq!(file.status, FileStatus::Unknown);
    }

    #[test]
    fn file_detail_splits_inline_and_remote_artifacts() {
        let detail: FileDetail = serde_json::from_str(
            r#"{
                "Id": "f1",
                "Name": "meeting.mp4",
                "Status": "active",
                "Url": "https://bucket.example/meeting.mp4?sig=abc",
                "Summary": "We agreed to ship on Friday.",
                "Transcript": "https://bucket.example/transcript.txt"
            }"#,
        )
        .unwrap();

        assert_eq!(detail.file.id, "f1");
        assert_eq!(
            detail.summary,
            Some(Artifact::Inline("We agreed to ship on Friday.".to_string()))
        );
        assert_eq!(
            detail.transcript,
            Some(Artifact::Remote(
                "https://bucket.example/transcript.txt".to_string()
            ))
        );
        assert_eq!(detail.action_items, None);
    }

    #[test]
    fn role_parses_system_admin_and_defaults_to_member() {
        let user: User = serde_json::from_str(
            r#"{"Username":"ana","Email":"ana@example.com","Role":"SystemAdmin"}"#,
        )
        .unwrap();
        assert!(user.is_system_admin());

        let user: User =
            serde_json::from_str(r#"{"Username":"bo","Role":"editor"}"#).unwrap();
        assert_eq!(user.role, Some(Role::Member));
        assert_eq!(user.display_name(), "bo");
    }

    #[test]
    fn ordered_questions_sort_by_sequence_number() {
        let set: QuestionSet = serde_json::from_str(
            r#"{"Id":"q","Questions":[
                {"SequenceNumber":2,"Question":"b","OptionA":"","OptionB":"","OptionC":"","OptionD":""},
                {"SequenceNumber":1,"Question":"a","OptionA":"","OptionB":"","OptionC":"","OptionD":""}
            ]}"#,
        )
        .unwrap();
        let order: Vec<u32> = set.ordered_questions().iter().map(|q| q.sequence_number).collect();
        assert_eq!(order, vec![1, 2]);
    }
}
