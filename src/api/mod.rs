use serde::Serialize;
use utoipa::ToSchema;

pub mod analytics;
pub mod attendance;
pub mod dashboard;
pub mod employee;

/// Legacy wrapper kept for the delete endpoints.
#[derive(Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    #[schema(example = "Employee deleted successfully")]
    pub message: String,
}
