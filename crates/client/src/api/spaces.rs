use spacedash_shared::{AddMemberRequest, ApiError, Space, SpaceList, SpaceRequest, User, UserList};

use super::seg;
use crate::api_client::ApiClient;

impl ApiClient {
    pub async fn list_spaces(&self) -> Result<Vec<Space>, ApiError> {
        let list: SpaceList = self.get_json("/spaces").await?;
        Ok(list.spaces)
    }

    pub async fn create_space(&self, req: &SpaceRequest) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>("/spaces", req).await?;
        Ok(())
    }

    pub async fn update_space(&self, space_id: &str, req: &SpaceRequest) -> Result<(), ApiError> {
        self.put_json::<_, serde_json::Value>(&format!("/spaces/{}", seg(space_id)), req)
            .await?;
        Ok(())
    }

    pub async fn delete_space(&self, space_id: &str) -> Result<(), ApiError> {
        self.delete_json(&format!("/spaces/{}", seg(space_id))).await
    }

    pub async fn list_space_members(&self, space_id: &str) -> Result<Vec<User>, ApiError> {
        let list: UserList = self
            .get_json(&format!("/spaces/{}/users", seg(space_id)))
            .await?;
        Ok(list.users)
    }

    pub async fn add_space_member(&self, space_id: &str, username: &str) -> Result<(), ApiError> {
        let req = AddMemberRequest {
            username: username.to_string(),
        };
        self.post_json::<_, serde_json::Value>(&format!("/spaces/{}/users", seg(space_id)), &req)
            .await?;
        Ok(())
    }

    pub async fn remove_space_member(&self, space_id: &str, username: &str) -> Result<(), ApiError> {
        self.delete_json(&format!("/spaces/{}/users/{}", seg(space_id), seg(username)))
            .await
    }
}
