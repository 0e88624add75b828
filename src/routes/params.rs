use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

// `status` stays a raw string: an unknown value lists nothing instead of failing.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BorrowRequestQuery {
    /// PENDING, APPROVED, REJECTED or RETURNED, any letter case.
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub equipment_id: Option<String>,
}
