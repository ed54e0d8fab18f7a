use super::{
    client::ApiClient,
    types::{CourseResponse, CreateCourseRequest, Page, UpdateCourseRequest},
};
use crate::error::ApiError;

fn course_params(
    institution_id: Option<&str>,
    page: Option<u32>,
    per_page: Option<u32>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(institution_id) = institution_id {
        params.push(("institutionId", institution_id.to_string()));
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
    pub async fn list_courses(
        &self,
        institution_id: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<CourseResponse>, ApiError> {
        let params = course_params(institution_id, page, per_page);
        let response = self
            .send_with_refresh(|| {
                let mut request = self.http_client().get(format!("{}/courses", self.base_url()));
                if !params.is_empty() {
                    request = request.query(&params);
                }
                Ok(request)
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn get_course(&self, id: &str) -> Result<CourseResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .get(format!("{}/courses/{}", self.base_url(), id)))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn create_course(
        &self,
        request: CreateCourseRequest,
    ) -> Result<CourseResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .post(format!("{}/courses", self.base_url()))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn update_course(
        &self,
        id: &str,
        request: UpdateCourseRequest,
    ) -> Result<CourseResponse, ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .put(format!("{}/courses/{}", self.base_url(), id))
                    .json(&request))
            })
            .await?;
        self.map_json_response(response).await
    }

    pub async fn delete_course(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .send_with_refresh(|| {
                Ok(self
                    .http_client()
                    .delete(format!("{}/courses/{}", self.base_url(), id)))
            })
            .await?;
        self.map_unit_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_params_include_institution_filter() {
        let params = course_params(Some("inst-1"), None, Some(50));
        assert!(params.contains(&("institutionId", "inst-1".to_string())));
        assert!(params.contains(&("perPage", "50".to_string())));
        assert!(!params.iter().any(|(key, _)| *key == "page"));
    }
}
