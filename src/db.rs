use crate::config::Config;
use crate::error::StoreError;
use crate::model::{Book, BookFields, BookForm};
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;

const SYSTEM_MIGRATIONS: &[(&str, &str)] = &[(
    "system/000_migrations_table.sql",
    include_str!("migrations/system/000_migrations_table.sql"),
)];

const MIGRATIONS: &[(&str, &str)] =
    &[("001_schema.sql", include_str!("migrations/001_schema.sql"))];

pub struct Database {
    _db: LibsqlDatabase,
    conn: Connection,
}

impl Database {
    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(cfg.app.get_db());
        Self::open(path).await
    }

    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (filename, sql) in SYSTEM_MIGRATIONS {
            Self::run_migration(&conn, filename, sql).await?;
        }

        for (filename, sql) in MIGRATIONS {
            Self::run_migration(&conn, filename, sql).await?;
        }

        Ok(Database { _db: db, conn })
    }

    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        let query = r#"
            SELECT id, title, author, genre, year, created_at, updated_at
            FROM books
            ORDER BY id
        "#;

        let mut rows = self.conn.query(query, ()).await?;
        let mut books = Vec::new();

        while let Some(row) = rows.next().await? {
            books.push(self.row_to_book(&row)?);
        }

        Ok(books)
    }

    pub async fn search_books(&self, term: &str) -> Result<Vec<Book>> {
        let query = r#"
            SELECT id, title, author, genre, year, created_at, updated_at
            FROM books
            WHERE title LIKE ? OR author LIKE ? OR genre LIKE ? OR CAST(year AS TEXT) LIKE ?
            ORDER BY id
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                (
                    format!("%{}%", term),
                    format!("%{}%", term),
                    format!("%{}%", term),
                    format!("%{}%", term),
                ),
            )
            .await?;
        let mut books = Vec::new();

        while let Some(row) = rows.next().await? {
            books.push(self.row_to_book(&row)?);
        }

        Ok(books)
    }

    pub async fn get_book(&self, id: i64) -> Result<Option<Book>> {
        let query = r#"
            SELECT id, title, author, genre, year, created_at, updated_at
            FROM books WHERE id = ?
        "#;

        let mut rows = self.conn.query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(self.row_to_book(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn create_book(&self, form: &BookForm) -> Result<Book, StoreError> {
        let fields = form.validate().map_err(StoreError::Validation)?;
        Ok(self.insert_book(&fields).await?)
    }

    async fn insert_book(&self, fields: &BookFields) -> Result<Book> {
        let query = r#"
            INSERT INTO books (title, author, genre, year)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, author, genre, year, created_at, updated_at
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![
                    fields.title.as_str(),
                    fields.author.as_str(),
                    fields.genre.as_deref(),
                    fields.year
                ],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(self.row_to_book(&row)?)
        } else {
            anyhow::bail!("Failed to create book")
        }
    }

    pub async fn update_book(&self, id: i64, form: &BookForm) -> Result<Book, StoreError> {
        if self.get_book(id).await?.is_none() {
            return Err(StoreError::NotFound(id));
        }

        let fields = form.validate().map_err(StoreError::Validation)?;

        match self.apply_update(id, &fields).await? {
            Some(book) => Ok(book),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn apply_update(&self, id: i64, fields: &BookFields) -> Result<Option<Book>> {
        let query = r#"
            UPDATE books
            SET title = ?, author = ?, genre = ?, year = ?,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?
            RETURNING id, title, author, genre, year, created_at, updated_at
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![
                    fields.title.as_str(),
                    fields.author.as_str(),
                    fields.genre.as_deref(),
                    fields.year,
                    id
                ],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(self.row_to_book(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM books WHERE id = ?", libsql::params![id])
            .await
            .map_err(anyhow::Error::from)?;

        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn row_to_book(&self, row: &libsql::Row) -> Result<Book> {
        Ok(Book {
            id: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            genre: row.get(3)?,
            year: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}
