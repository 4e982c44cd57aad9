use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod groups;
mod members;
mod server;
mod settlement;
mod transactions;

pub mod types {
    pub mod group {
        pub use api_types::group::{GroupNew, GroupSummaryView, GroupView, GroupsResponse};
    }

    pub mod member {
        pub use api_types::member::{MemberNew, MemberView, MembersResponse};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            SplitInput, SplitPolicy, SplitView, TransactionCreated, TransactionDetail,
            TransactionListResponse, TransactionNew, TransactionView,
        };
    }

    pub mod settlement {
        pub use api_types::settlement::{SettleResponse, SettleStatus};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::GroupNotFound(_)
        | EngineError::MemberNotFound(_)
        | EngineError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::MemberNotSettled { .. } => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::PayerNotInGroup(_)
        | EngineError::InvalidInput(_)
        | EngineError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use engine::MoneyCents;
    use sea_orm::DbErr;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        for err in [
            EngineError::GroupNotFound(Uuid::nil()),
            EngineError::MemberNotFound(Uuid::nil()),
            EngineError::TransactionNotFound(Uuid::nil()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn unsettled_member_maps_to_409() {
        let res = ServerError::from(EngineError::MemberNotSettled {
            member_id: Uuid::nil(),
            balance: MoneyCents::new(5_00),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        for err in [
            EngineError::InvalidAmount("x".to_string()),
            EngineError::InvalidInput("x".to_string()),
            EngineError::PayerNotInGroup(Uuid::nil()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn database_error_maps_to_500() {
        let res = ServerError::from(EngineError::Database(DbErr::Custom("boom".to_string())))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
