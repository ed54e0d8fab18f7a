use serde_json::json;

use super::{
    client::ApiClient,
    types::{ChartResponse, CreateChartRequest, UpdateChartRequest},
};
use crate::error::ApiError;

impl ApiClient {
    /// Requirement tables, optionally narrowed to one course.
    pub async fn list_charts(
        &self,
        course_id: Option<&str>,
    ) -> Result<Vec<ChartResponse>, ApiError> {
        let mut params = Vec::new();
        if let Some(course_id) = course_id {
            params.push(("courseId", course_id.to_string()));
        }
        let response = self
            .send_with_refresh(|| {
                let mut request = self.http_client().get(format!("{}/charts", self.base_url()));
                if !params.is_empty() {
                    request = request.query(&params);
                }
                Ok(request)
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn get_chart(&self, id: &str) -> Result<ChartResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .get(format!("{}/charts/{}", self.base_url(), id)))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn create_chart(&self, request: CreateChartRequest) -> Result<ChartResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .post(format!("{}/charts", self.base_url()))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn update_chart(
        &self,
        id: &str,
        request: UpdateChartRequest,
    ) -> Result<ChartResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .put(format!("{}/charts/{}", self.base_url(), id))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    /// Only one chart per course is active at a time; activating one is a
    /// dedicated operation rather than a field update.
    pub async fn set_chart_active(&self, id: &str, active: bool) -> Result<ChartResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .patch(format!("{}/charts/{}/active", self.base_url(), id))
                    .json(&json!({ "isActive": active })))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn delete_chart(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .delete(format!("{}/charts/{}", self.base_url(), id)))
            })
            .await?;
        self.map_unit_response(response).await
    }
}
