use spacedash_shared::{
    check_alignment, grade, ApiError, GenerateQuestionsRequest, QuestionSet, QuestionSetList,
    QuizScore, SubmitAnswersRequest, SubmitAnswersResponse, TestResult,
};

use super::seg;
use crate::api_client::ApiClient;

fn question_set_path(space_id: &str, set_id: &str) -> String {
    format!("/spaces/{}/questions/{}", seg(space_id), seg(set_id))
}

impl ApiClient {
    pub async fn list_question_sets(&self, space_id: &str) -> Result<Vec<QuestionSet>, ApiError> {
        let list: QuestionSetList = self
            .get_json(&format!("/spaces/{}/questions", seg(space_id)))
            .await?;
        Ok(list.question_sets)
    }

    pub async fn get_question_set(&self, space_id: &str, set_id: &str) -> Result<QuestionSet, ApiError> {
        self.get_json(&question_set_path(space_id, set_id)).await
    }

    pub async fn generate_question_set(
        &self,
        space_id: &str,
        req: &GenerateQuestionsRequest,
    ) -> Result<QuestionSet, ApiError> {
        self.post_json(&format!("/spaces/{}/questions", seg(space_id)), req)
            .await
    }

    pub async fn delete_question_set(&self, space_id: &str, set_id: &str) -> Result<(), ApiError> {
        self.delete_json(&question_set_path(space_id, set_id)).await
    }

    /// Submit answers in question order and get the answer key back.
    pub async fn submit_answers(
        &self,
        space_id: &str,
        set_id: &str,
        answers: Vec<String>,
    ) -> Result<Vec<TestResult>, ApiError> {
        let req = SubmitAnswersRequest { answers };
        let resp: SubmitAnswersResponse = self
            .post_json(&format!("{}/submit", question_set_path(space_id, set_id)), &req)
            .await?;
        Ok(resp.results)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Grading(#[from] spacedash_shared::GradingError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ApiClient {
    /// Check alignment, submit, and grade in one go.
    ///
    /// `answers[i]` must answer the i-th question in sequence order.
    pub async fn submit_and_grade(
        &self,
        set: &QuestionSet,
        answers: Vec<String>,
    ) -> Result<QuizScore, SubmitError> {
        let questions: Vec<_> = set.ordered_questions().into_iter().cloned().collect();
        check_alignment(&questions, &answers)?;
        let results = self
            .submit_answers(&set.space_id, &set.id, answers.clone())
            .await?;
        Ok(grade(&questions, &answers, &results)?)
    }
}
