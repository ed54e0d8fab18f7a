//! Wire types for the SIGAC REST API.
//!
//! The API is a Node service and speaks camelCase JSON; every DTO here is
//! renamed accordingly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Access tiers, in ascending order of authority.
///
/// The derived order is the comparison the guards use: a level grants a
/// requirement exactly when it sorts at or above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessLevel {
    Student,
    ActivityCoordinator,
    CourseCoordinator,
    CampusAdmin,
    GeneralAdmin,
}

impl AccessLevel {
    /// Canonical wire representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Student => "student",
            AccessLevel::ActivityCoordinator => "activityCoordinator",
            AccessLevel::CourseCoordinator => "courseCoordinator",
            AccessLevel::CampusAdmin => "campusAdmin",
            AccessLevel::GeneralAdmin => "generalAdmin",
        }
    }

    /// Numeric tier, `0` for students up to `4` for general administrators.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Whether this level satisfies a page's minimum requirement.
    pub fn grants(&self, required: AccessLevel) -> bool {
        *self >= required
    }
}

impl Serialize for AccessLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AccessLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            // primary canonical values (camelCase)
            "student" => Ok(AccessLevel::Student),
            "activityCoordinator" => Ok(AccessLevel::ActivityCoordinator),
            "courseCoordinator" => Ok(AccessLevel::CourseCoordinator),
            "campusAdmin" => Ok(AccessLevel::CampusAdmin),
            "generalAdmin" => Ok(AccessLevel::GeneralAdmin),
            // tolerate snake_case from older exports
            "activity_coordinator" => Ok(AccessLevel::ActivityCoordinator),
            "course_coordinator" => Ok(AccessLevel::CourseCoordinator),
            "campus_admin" => Ok(AccessLevel::CampusAdmin),
            "general_admin" => Ok(AccessLevel::GeneralAdmin),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &[
                    "student",
                    "activityCoordinator",
                    "courseCoordinator",
                    "campusAdmin",
                    "generalAdmin",
                ],
            )),
        }
    }
}

/// Error body the API attaches to non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Pagination envelope used by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// An account as the API reports it, for the session user and admin lists.
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Brazilian tax id, the natural login identifier in the source system.
    pub cpf: String,
    pub access_level: AccessLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Credentials submitted when opening a session.
pub struct CreateSessionRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Token pair and account returned by a successful sign-in.
pub struct SessionResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Rotated token pair returned by the refresh endpoint.
pub struct RefreshResponse {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionResponse {
    pub id: String,
    pub name: String,
    pub acronym: String,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstitutionRequest {
    pub name: String,
    pub acronym: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstitutionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub institution_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub institution_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Kind of complementary activity (teaching, research, outreach, ...).
pub struct ActivityCategoryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityCategoryRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityCategoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Per-category hour cap inside a chart.
pub struct ChartRequirement {
    pub category_id: String,
    pub max_hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Requirement table binding a course to its hour targets.
pub struct ChartResponse {
    pub id: String,
    pub course_id: String,
    pub name: String,
    pub required_hours: u32,
    pub is_active: bool,
    #[serde(default)]
    pub requirements: Vec<ChartRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChartRequest {
    pub course_id: String,
    pub name: String,
    pub required_hours: u32,
    pub requirements: Vec<ChartRequirement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChartRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<ChartRequirement>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulationResponse {
    pub id: String,
    pub course_id: String,
    pub name: String,
    pub document_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegulationRequest {
    pub course_id: String,
    pub name: String,
    pub document_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A student's submitted activity and its review trail.
pub struct ActivityResponse {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub chart_id: String,
    pub description: String,
    /// Hours claimed by the student.
    pub hours: u32,
    /// Hours granted by the reviewer, once reviewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarded_hours: Option<u32>,
    pub status: ActivityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub category_id: String,
    pub chart_id: String,
    pub description: String,
    pub hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub cpf: String,
    pub password: String,
    pub access_level: AccessLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
