use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Current-season constructor standing, keyed by the source's constructor id.
///
/// Unlike drivers, constructors carry no active flag: a row that drops out of
/// the source snapshot is simply left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CurrentConstructor {
    pub constructor_id: String,
    pub name: String,
    pub nationality: String,
    pub points: Decimal,
    pub position: i32,
}
