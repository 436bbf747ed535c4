//! Public booking calendar endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    calendar::parse_date,
    error::AppResult,
    models::availability::{DayAvailability, MonthQuery, PublicMonthView},
};

use super::availability::month_param;

/// Whole-day availability of a month
#[utoipa::path(
    get,
    path = "/calendar",
    tag = "calendar",
    params(MonthQuery),
    responses(
        (status = 200, description = "Month grid", body = PublicMonthView),
        (status = 400, description = "Invalid month", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_month(
    State(state): State<crate::AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<PublicMonthView>> {
    let month = month_param(query.month.as_deref())?;
    let view = state.services.calendar.month(month).await?;
    Ok(Json(view))
}

/// Slots of one date
#[utoipa::path(
    get,
    path = "/calendar/{date}",
    tag = "calendar",
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Day details", body = DayAvailability),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_day(
    State(state): State<crate::AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<DayAvailability>> {
    let date = parse_date(&date)?;
    let day = state.services.calendar.day(date).await?;
    Ok(Json(day))
}
