//! Envelope helpers and conversion of domain errors into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use tracing::{debug, error};

use fintools_core::inventory::InventoryError;
use fintools_db::repositories::{
    AssetError, DashboardError, ExpenseError, ProductError, RevenueError, TransactionError,
};
use fintools_shared::{ApiEnvelope, AppError, ErrorMessage};

/// Serializes an envelope with the given status.
pub fn respond<T: Serialize>(status: StatusCode, body: ApiEnvelope<T>) -> Response {
    (status, Json(body)).into_response()
}

/// `200 OK` with `data`.
pub fn ok<T: Serialize>(data: T) -> Response {
    respond(StatusCode::OK, ApiEnvelope::ok(data))
}

/// `201 Created` with `data`.
pub fn created<T: Serialize>(data: T) -> Response {
    respond(StatusCode::CREATED, ApiEnvelope::ok(data))
}

/// `200 OK` with a counted list.
pub fn list<T: Serialize>(items: Vec<T>) -> Response {
    respond(StatusCode::OK, ApiEnvelope::list(items))
}

/// `200 OK` with an empty object, for deletions.
pub fn deleted() -> Response {
    ok(serde_json::json!({}))
}

/// Turns an error into a failure envelope.
///
/// Server-side failures are logged with their details under `context`; the
/// client only sees the generic message.
pub fn failure(context: &str, err: &AppError) -> Response {
    if err.is_server_error() {
        error!(error = %err, "{context}");
    } else {
        debug!(error = %err, "{context}");
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match err {
        AppError::Validation(messages) => ErrorMessage::Many(messages.clone()),
        other => ErrorMessage::One(other.public_messages().join(", ")),
    };

    respond(status, ApiEnvelope::<()>::failure(message))
}

// ============================================================================
// Domain error mapping
// ============================================================================

/// Quantity and amount problems are input errors; everything else is a state conflict.
pub fn map_inventory_error(err: InventoryError) -> AppError {
    if err.is_validation() {
        AppError::validation(err.to_string())
    } else {
        AppError::Conflict(err.to_string())
    }
}

/// Storage failures are server errors.
pub fn map_db_error(err: DbErr) -> AppError {
    AppError::Database(err.to_string())
}

/// Maps expense repository errors.
pub fn map_expense_error(err: ExpenseError) -> AppError {
    match err {
        ExpenseError::NotFound(_) | ExpenseError::NoProduct(_) => {
            AppError::NotFound(err.to_string())
        }
        ExpenseError::Inventory(e) => map_inventory_error(e),
        ExpenseError::Database(e) => map_db_error(e),
    }
}

/// Maps product repository errors.
pub fn map_product_error(err: ProductError) -> AppError {
    match err {
        ProductError::NotFound(_) | ProductError::ExpenseNotFound(_) => {
            AppError::NotFound(err.to_string())
        }
        ProductError::AlreadyCreated(_) => AppError::Conflict(err.to_string()),
        ProductError::MissingField(message) => AppError::validation(message),
        ProductError::Inventory(e) => map_inventory_error(e),
        ProductError::Database(e) => map_db_error(e),
    }
}

/// Maps revenue repository errors.
pub fn map_revenue_error(err: RevenueError) -> AppError {
    match err {
        RevenueError::NotFound(_) => AppError::NotFound(err.to_string()),
        RevenueError::Database(e) => map_db_error(e),
    }
}

/// Maps asset repository errors.
pub fn map_asset_error(err: AssetError) -> AppError {
    match err {
        AssetError::NotFound(_) => AppError::NotFound(err.to_string()),
        AssetError::MissingValue => AppError::validation(err.to_string()),
        AssetError::Database(e) => map_db_error(e),
    }
}

/// Maps transaction repository errors; only the creator may change a transaction.
pub fn map_transaction_error(err: TransactionError) -> AppError {
    match err {
        TransactionError::NotFound(_) => AppError::NotFound(err.to_string()),
        TransactionError::NotCreator => AppError::Forbidden(err.to_string()),
        TransactionError::Database(e) => map_db_error(e),
    }
}

/// Maps aggregation errors; a bad window is a client error.
pub fn map_dashboard_error(err: DashboardError) -> AppError {
    match err {
        DashboardError::Window(e) => AppError::validation(e.to_string()),
        DashboardError::Database(e) => map_db_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_inventory_errors_split_by_kind() {
        let short = InventoryError::InsufficientQuantity {
            available: 1,
            requested: 2,
        };
        assert_eq!(map_inventory_error(short).status_code(), 400);
        assert!(matches!(
            map_inventory_error(InventoryError::AlreadySold),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            map_inventory_error(InventoryError::InvalidQuantity),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_not_found_keeps_message() {
        let err = map_expense_error(ExpenseError::NoProduct(Uuid::new_v4()));
        assert_eq!(err.status_code(), 404);
        assert_eq!(
            err.public_messages(),
            vec!["No product found for this expense".to_string()]
        );
    }

    #[test]
    fn test_non_creator_is_forbidden() {
        assert_eq!(
            map_transaction_error(TransactionError::NotCreator).status_code(),
            403
        );
    }

    #[test]
    fn test_database_errors_are_hidden() {
        let err = map_revenue_error(RevenueError::Database(DbErr::Custom("boom".into())));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_messages(), vec!["Server Error".to_string()]);
    }

    #[test]
    fn test_failure_status() {
        let response = failure("test", &AppError::validation("Amount is required"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
