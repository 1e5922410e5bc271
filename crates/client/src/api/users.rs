use spacedash_shared::{ApiError, CreateUserRequest, UpdateUserRequest, User, UserList};

use super::seg;
use crate::api_client::ApiClient;

impl ApiClient {
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let list: UserList = self.get_json("/users").await?;
        Ok(list.users)
    }

    pub async fn create_user(&self, req: &CreateUserRequest) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>("/users", req).await?;
        Ok(())
    }

    pub async fn update_user(&self, username: &str, req: &UpdateUserRequest) -> Result<(), ApiError> {
        self.put_json::<_, serde_json::Value>(&format!("/users/{}", seg(username)), req)
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, username: &str) -> Result<(), ApiError> {
        self.delete_json(&format!("/users/{}", seg(username))).await
    }
}
