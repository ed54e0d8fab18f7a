use super::{
    client::ApiClient,
    types::{ActivityCategoryResponse, CreateActivityCategoryRequest, UpdateActivityCategoryRequest},
};
use crate::error::ApiError;

impl ApiClient {
    /// Categories are a small lookup table; the API returns them unpaged.
    pub async fn list_activity_categories(
        &self,
    ) -> Result<Vec<ActivityCategoryResponse>, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .get(format!("{}/activity-categories", self.base_url())))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn get_activity_category(
        &self,
        id: &str,
    ) -> Result<ActivityCategoryResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .get(format!("{}/activity-categories/{}", self.base_url(), id)))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn create_activity_category(
        &self,
        request: CreateActivityCategoryRequest,
    ) -> Result<ActivityCategoryResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .post(format!("{}/activity-categories", self.base_url()))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn update_activity_category(
        &self,
        id: &str,
        request: UpdateActivityCategoryRequest,
    ) -> Result<ActivityCategoryResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .put(format!("{}/activity-categories/{}", self.base_url(), id))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn delete_activity_category(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .delete(format!("{}/activity-categories/{}", self.base_url(), id)))
            })
            .await?;
        self.map_unit_response(response).await
    }
}
