use serde_json::json;

use super::{
    client::ApiClient,
    types::{ActivityResponse, CreateActivityRequest, Page},
};
use crate::error::ApiError;

fn review_queue_params(
    status: Option<&str>,
    category_id: Option<&str>,
    page: Option<u32>,
    per_page: Option<u32>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(status) = status {
        params.push(("status", status.to_string()));
    }
    if let Some(category_id) = category_id {
        params.push(("categoryId", category_id.to_string()));
    }
    if let Some(page) = page {
        params.push(("page", page.to_string()));
    }
    if let Some(per_page) = per_page {
        params.push(("perPage", per_page.to_string()));
    }
    params
}

impl ApiClient {
    pub async fn submit_activity(
        &self,
        request: CreateActivityRequest,
    ) -> Result<ActivityResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .post(format!("{}/activities", self.base_url()))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    /// The signed-in student's own submissions.
    pub async fn get_my_activities(&self) -> Result<Vec<ActivityResponse>, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .get(format!("{}/activities/me", self.base_url())))
            })
            .await?;
        self.map_json_response(response).await
    }

    /// Submissions awaiting review, for coordinators and administrators.
    pub async fn list_activities_for_review(
        &self,
        status: Option<&str>,
        category_id: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<ActivityResponse>, ApiError> {
        let params = review_queue_params(status, category_id, page, per_page);
        let response = self
            .send_with_refresh(|| {
                let mut request = self
                    .http_client()
                    .get(format!("{}/activities", self.base_url()));
                if !params.is_empty() {
                    request = request.query(&params);
                }
                Ok(request)
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn get_activity(&self, id: &str) -> Result<ActivityResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .get(format!("{}/activities/{}", self.base_url(), id)))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn approve_activity(
        &self,
        id: &str,
        awarded_hours: u32,
        comment: &str,
    ) -> Result<ActivityResponse, ApiError> {
        self.review_activity(
            id,
            "approve",
            json!({ "awardedHours": awarded_hours, "comment": comment }),
        )
        .await
    }

    pub async fn reject_activity(
        &self,
        id: &str,
        comment: &str,
    ) -> Result<ActivityResponse, ApiError> {
        self.review_activity(id, "reject", json!({ "comment": comment }))
            .await
    }

    async fn review_activity(
        &self,
        id: &str,
        action: &str,
        body: serde_json::Value,
    ) -> Result<ActivityResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .put(format!("{}/activities/{}/{}", self.base_url(), id, action))
                    .json(&body))
            })
            .await?;
        self.map_json_response(response).await
    }

    /// Students may withdraw a submission while it is still pending.
    pub async fn cancel_activity(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .delete(format!("{}/activities/{}", self.base_url(), id)))
            })
            .await?;
        self.map_unit_response(response).await
    }
}
