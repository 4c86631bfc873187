use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::model::BookForm;
use crate::view;

/// Failures surfaced by the catalog store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid book: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("book {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

/// Request-level error; the `IntoResponse` impl picks the status code and
/// rendered page for each failure class.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid book: {}", errors.join("; "))]
    Validation {
        form: BookForm,
        book_id: Option<i64>,
        errors: Vec<String>,
    },

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation {
                form,
                book_id,
                errors,
            } => {
                let page = match book_id {
                    Some(id) => view::edit_book_page(id, &form, &errors),
                    None => view::new_book_page(&form, &errors),
                };
                (StatusCode::BAD_REQUEST, Html(page)).into_response()
            }
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Html(view::not_found_page())).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!("request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(view::error_page())).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_renders_bad_request() {
        let err = AppError::Validation {
            form: BookForm::default(),
            book_id: None,
            errors: vec![r#""title" is required"#.to_string()],
        };
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_renders_404() {
        assert_eq!(
            AppError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn internal_renders_500() {
        let err = AppError::Internal(anyhow::anyhow!("disk on fire"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
