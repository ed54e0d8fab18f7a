use super::{
    client::ApiClient,
    types::{CreateRegulationRequest, RegulationResponse},
};
use crate::error::ApiError;

impl ApiClient {
    pub async fn list_regulations(
        &self,
        course_id: Option<&str>,
    ) -> Result<Vec<RegulationResponse>, ApiError> {
        let mut params = Vec::new();
        if let Some(course_id) = course_id {
            params.push(("courseId", course_id.to_string()));
        }
        let response = self
            .send_with_refresh(|| {
                let mut request = self
                    .http_client()
                    .get(format!("{}/regulations", self.base_url()));
                if !params.is_empty() {
                    request = request.query(&params);
                }
                Ok(request)
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn get_regulation(&self, id: &str) -> Result<RegulationResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .get(format!("{}/regulations/{}", self.base_url(), id)))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn create_regulation(
        &self,
        request: CreateRegulationRequest,
    ) -> Result<RegulationResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .post(format!("{}/regulations", self.base_url()))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn delete_regulation(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .delete(format!("{}/regulations/{}", self.base_url(), id)))
            })
            .await?;
        self.map_unit_response(response).await
    }
}
