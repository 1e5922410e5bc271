use spacedash_shared::{
    ApiError, Artifact, FileDetail, FileList, SpaceFile, UpdateFileRequest, UploadRequest,
    UploadTicket,
};

use super::seg;
use crate::api_client::ApiClient;

fn file_path(space_id: &str, file_id: &str) -> String {
    format!("/spaces/{}/files/{}", seg(space_id), seg(file_id))
}

impl ApiClient {
    pub async fn list_files(&self, space_id: &str) -> Result<Vec<SpaceFile>, ApiError> {
        let list: FileList = self
            .get_json(&format!("/spaces/{}/files", seg(space_id)))
            .await?;
        Ok(list.files)
    }

    pub async fn get_file(&self, space_id: &str, file_id: &str) -> Result<FileDetail, ApiError> {
        self.get_json(&file_path(space_id, file_id)).await
    }

    /// Two steps: ask the API for a presigned URL, then PUT the bytes there.
    pub async fn upload_file(
        &self,
        space_id: &str,
        req: &UploadRequest,
        bytes: Vec<u8>,
    ) -> Result<UploadTicket, ApiError> {
        let ticket: UploadTicket = self
            .post_json(&format!("/spaces/{}/files", seg(space_id)), req)
            .await?;
        crate::log_info!("Uploading {} ({} bytes) as {}", req.file_name, bytes.len(), ticket.file_id);
        self.upload_bytes(&ticket.upload_url, &req.file_type, bytes)
            .await?;
        Ok(ticket)
    }

    pub async fn update_file(
        &self,
        space_id: &str,
        file_id: &str,
        req: &UpdateFileRequest,
    ) -> Result<(), ApiError> {
        self.put_json::<_, serde_json::Value>(&file_path(space_id, file_id), req)
            .await?;
        Ok(())
    }

    pub async fn delete_file(&self, space_id: &str, file_id: &str) -> Result<(), ApiError> {
        self.delete_json(&file_path(space_id, file_id)).await
    }

    /// Text of an artifact, fetching it if the server only gave a URL.
    pub async fn resolve_artifact(&self, artifact: &Artifact) -> Result<String, ApiError> {
        match artifact {
            Artifact::Inline(text) => Ok(text.clone()),
            Artifact::Remote(url) => self.fetch_text(url).await,
        }
    }
}
