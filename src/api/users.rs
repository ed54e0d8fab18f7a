use serde_json::json;

use super::{
    client::ApiClient,
    types::{
        AccessLevel, CreateUserRequest, Page, UpdateProfileRequest, UpdateUserRequest, UserResponse,
    },
};
use crate::error::ApiError;

fn user_params(
    search: Option<&str>,
    page: Option<u32>,
    per_page: Option<u32>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(search) = search {
        params.push(("search", search.to_string()));
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
    /// Account behind the current access token. The session layer calls this
    /// on startup to rebuild its user state.
    pub async fn get_profile(&self) -> Result<UserResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .get(format!("{}/users/profile", self.base_url())))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UserResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .patch(format!("{}/users/profile", self.base_url()))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn list_users(
        &self,
        search: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<UserResponse>, ApiError> {
        let params = user_params(search, page, per_page);
        let response = self
            .send_with_refresh(|| {
                let mut request = self.http_client().get(format!("{}/users", self.base_url()));
                if !params.is_empty() {
                    request = request.query(&params);
                }
                Ok(request)
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .post(format!("{}/users", self.base_url()))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn update_user(
        &self,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .put(format!("{}/users/{}", self.base_url(), id))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn change_access_level(
        &self,
        id: &str,
        access_level: AccessLevel,
    ) -> Result<UserResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .patch(format!("{}/users/{}/access-level", self.base_url(), id))
                    .json(&json!({ "accessLevel": access_level })))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .delete(format!("{}/users/{}", self.base_url(), id)))
            })
            .await?;
        self.map_unit_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_params_include_search_and_paging() {
        let params = user_params(Some("silva"), Some(1), Some(10));
        assert!(params.contains(&("search", "silva".to_string())));
        assert!(params.contains(&("page", "1".to_string())));
        assert!(params.contains(&("perPage", "10".to_string())));
    }
}
