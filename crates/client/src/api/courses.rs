use spacedash_shared::{
    ApiError, Course, CourseList, CourseRequest, Lesson, LessonList, LessonRequest, Section,
    SectionList, SectionRequest,
};

use super::seg;
use crate::api_client::ApiClient;

/// Server-side pagination and search for the course list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
}

impl Default for CourseQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: String::new(),
        }
    }
}

impl CourseQuery {
    pub fn to_query_string(&self) -> String {
        let mut query = format!("page={}&limit={}", self.page.max(1), self.limit.max(1));
        let search = self.search.trim();
        if !search.is_empty() {
            query.push_str("&search=");
            query.push_str(&urlencoding::encode(search));
        }
        query
    }
}

fn course_path(space_id: &str, course_id: &str) -> String {
    format!("/spaces/{}/courses/{}", seg(space_id), seg(course_id))
}

fn section_path(space_id: &str, course_id: &str, section_id: &str) -> String {
    format!("{}/sections/{}", course_path(space_id, course_id), seg(section_id))
}

impl ApiClient {
    pub async fn list_courses(&self, space_id: &str, query: &CourseQuery) -> Result<CourseList, ApiError> {
        self.get_json(&format!(
            "/spaces/{}/courses?{}",
            seg(space_id),
            query.to_query_string()
        ))
        .await
    }

    pub async fn get_course(&self, space_id: &str, course_id: &str) -> Result<Course, ApiError> {
        self.get_json(&course_path(space_id, course_id)).await
    }

    pub async fn create_course(&self, space_id: &str, req: &CourseRequest) -> Result<Course, ApiError> {
        self.post_json(&format!("/spaces/{}/courses", seg(space_id)), req)
            .await
    }

    pub async fn update_course(
        &self,
        space_id: &str,
        course_id: &str,
        req: &CourseRequest,
    ) -> Result<(), ApiError> {
        self.put_json::<_, serde_json::Value>(&course_path(space_id, course_id), req)
            .await?;
        Ok(())
    }

    pub async fn delete_course(&self, space_id: &str, course_id: &str) -> Result<(), ApiError> {
        self.delete_json(&course_path(space_id, course_id)).await
    }

    // --- Sections ---

    pub async fn list_sections(&self, space_id: &str, course_id: &str) -> Result<Vec<Section>, ApiError> {
        let list: SectionList = self
            .get_json(&format!("{}/sections", course_path(space_id, course_id)))
            .await?;
        Ok(list.sections)
    }

    pub async fn get_section(
        &self,
        space_id: &str,
        course_id: &str,
        section_id: &str,
    ) -> Result<Section, ApiError> {
        self.get_json(&section_path(space_id, course_id, section_id))
            .await
    }

    pub async fn create_section(
        &self,
        space_id: &str,
        course_id: &str,
        req: &SectionRequest,
    ) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>(
            &format!("{}/sections", course_path(space_id, course_id)),
            req,
        )
        .await?;
        Ok(())
    }

    pub async fn update_section(
        &self,
        space_id: &str,
        course_id: &str,
        section_id: &str,
        req: &SectionRequest,
    ) -> Result<(), ApiError> {
        self.put_json::<_, serde_json::Value>(&section_path(space_id, course_id, section_id), req)
            .await?;
        Ok(())
    }

    pub async fn delete_section(
        &self,
        space_id: &str,
        course_id: &str,
        section_id: &str,
    ) -> Result<(), ApiError> {
        self.delete_json(&section_path(space_id, course_id, section_id))
            .await
    }

    // --- Lessons ---

    pub async fn list_lessons(
        &self,
        space_id: &str,
        course_id: &str,
        section_id: &str,
    ) -> Result<Vec<Lesson>, ApiError> {
        let list: LessonList = self
            .get_json(&format!(
                "{}/lessons",
                section_path(space_id, course_id, section_id)
            ))
            .await?;
        Ok(list.lessons)
    }

    pub async fn get_lesson(
        &self,
        space_id: &str,
        course_id: &str,
        section_id: &str,
        lesson_id: &str,
    ) -> Result<Lesson, ApiError> {
        self.get_json(&format!(
            "{}/lessons/{}",
            section_path(space_id, course_id, section_id),
            seg(lesson_id)
        ))
        .await
    }

    pub async fn create_lesson(
        &self,
        space_id: &str,
        course_id: &str,
        section_id: &str,
        req: &LessonRequest,
    ) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>(
            &format!("{}/lessons", section_path(space_id, course_id, section_id)),
            req,
        )
        .await?;
        Ok(())
    }

    pub async fn update_lesson(
        &self,
        space_id: &str,
        course_id: &str,
        section_id: &str,
        lesson_id: &str,
        req: &LessonRequest,
    ) -> Result<(), ApiError> {
        self.put_json::<_, serde_json::Value>(
            &format!(
                "{}/lessons/{}",
                section_path(space_id, course_id, section_id),
                seg(lesson_id)
            ),
            req,
        )
        .await?;
        Ok(())
    }

    pub async fn delete_lesson(
        &self,
        space_id: &str,
        course_id: &str,
        section_id: &str,
        lesson_id: &str,
    ) -> Result<(), ApiError> {
        self.delete_json(&format!(
            "{}/lessons/{}",
            section_path(space_id, course_id, section_id),
            seg(lesson_id)
        ))
        .await
    }
}
