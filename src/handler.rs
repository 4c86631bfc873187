use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
};

use serde::Deserialize;
use tracing::info;

use crate::assets;
use crate::db::Database;
use crate::error::{AppError, AppResult, StoreError};
use crate::model::BookForm;
use crate::view;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/", post(search_books))
        .route("/books", get(list_books))
        .route("/books/new", get(new_book))
        .route("/books/new", post(create_book))
        .route("/books/:id", get(edit_book))
        .route("/books/:id", post(update_book))
        .route("/books/:id/delete", post(delete_book))
        .route("/static/*path", get(assets::serve_static))
        .fallback(not_found)
}

/// Route ids arrive as path segments; anything non-numeric is treated as an
/// unmatched path rather than a malformed request.
fn parse_book_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| AppError::NotFound)
}

async fn index() -> Redirect {
    Redirect::to("/books")
}

async fn list_books(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books = state.db.list_books().await?;
    Ok(Html(view::book_list_page(&books, "")))
}

async fn search_books(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> AppResult<Html<String>> {
    let term = form.search.trim();
    let books = if term.is_empty() {
        state.db.list_books().await?
    } else {
        state.db.search_books(term).await?
    };

    info!("search for {:?} matched {} books", term, books.len());
    Ok(Html(view::book_list_page(&books, term)))
}

async fn new_book() -> Html<String> {
    Html(view::new_book_page(&BookForm::default(), &[]))
}

async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Redirect> {
    match state.db.create_book(&form).await {
        Ok(book) => {
            info!("created book {} ({})", book.id, book.title);
            Ok(Redirect::to("/books"))
        }
        Err(StoreError::Validation(errors)) => Err(AppError::Validation {
            form,
            book_id: None,
            errors,
        }),
        Err(StoreError::NotFound(_)) => Err(AppError::NotFound),
        Err(StoreError::Db(e)) => Err(AppError::Internal(e)),
    }
}

async fn edit_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_book_id(&id)?;
    let book = state.db.get_book(id).await?.ok_or(AppError::NotFound)?;

    Ok(Html(view::edit_book_page(
        id,
        &BookForm::from_book(&book),
        &[],
    )))
}

async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Redirect> {
    let id = parse_book_id(&id)?;

    match state.db.update_book(id, &form).await {
        Ok(book) => {
            info!("updated book {} ({})", book.id, book.title);
            Ok(Redirect::to("/"))
        }
        Err(StoreError::Validation(errors)) => Err(AppError::Validation {
            form,
            book_id: Some(id),
            errors,
        }),
        Err(StoreError::NotFound(_)) => Err(AppError::NotFound),
        Err(StoreError::Db(e)) => Err(AppError::Internal(e)),
    }
}

async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let id = parse_book_id(&id)?;

    match state.db.delete_book(id).await {
        Ok(()) => {
            info!("deleted book {}", id);
            Ok(Redirect::to("/books"))
        }
        Err(StoreError::NotFound(_)) => Err(AppError::NotFound),
        Err(e) => Err(AppError::Internal(anyhow::Error::from(e))),
    }
}

async fn not_found() -> AppError {
    AppError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_book_id_accepts_digits_only() {
        assert_eq!(parse_book_id("12").unwrap(), 12);
        assert!(parse_book_id("abc").is_err());
        assert!(parse_book_id("12abc").is_err());
        assert!(parse_book_id("").is_err());
    }
}
