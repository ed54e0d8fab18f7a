use super::{
    client::ApiClient,
    types::{CreateInstitutionRequest, InstitutionResponse, Page, UpdateInstitutionRequest},
};
use crate::error::ApiError;

fn institution_params(
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
    pub async fn list_institutions(
        &self,
        search: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<InstitutionResponse>, ApiError> {
        let params = institution_params(search, page, per_page);
        let response = self
            .send_with_refresh(|| {
                let mut request = self
                    .http_client()
                    .get(format!("{}/institutions", self.base_url()));
                if !params.is_empty() {
                    request = request.query(&params);
                }
                Ok(request)
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn get_institution(&self, id: &str) -> Result<InstitutionResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .get(format!("{}/institutions/{}", self.base_url(), id)))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn create_institution(
        &self,
        request: CreateInstitutionRequest,
    ) -> Result<InstitutionResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .post(format!("{}/institutions", self.base_url()))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn update_institution(
        &self,
        id: &str,
        request: UpdateInstitutionRequest,
    ) -> Result<InstitutionResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .put(format!("{}/institutions/{}", self.base_url(), id))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn delete_institution(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .delete(format!("{}/institutions/{}", self.base_url(), id)))
            })
            .await?;
        self.map_unit_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn institution_params_skip_missing_values() {
        let params = institution_params(None, None, None);
        assert!(params.is_empty());
    }

    #[test]
    fn institution_params_include_filters() {
        let params = institution_params(Some("federal"), Some(2), Some(25));
        assert!(params.contains(&("search", "federal".to_string())));
        assert!(params.contains(&("page", "2".to_string())));
        assert!(params.contains(&("perPage", "25".to_string())));
    }
}
