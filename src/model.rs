use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Raw values from a submitted book form. Blank inputs arrive as empty
/// strings; fields missing from the body default to empty as well.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i64>,
}

impl BookForm {
    pub fn from_book(book: &Book) -> Self {
        BookForm {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }

    /// Checks the required-field constraints and converts the raw strings
    /// into typed fields. Collects every failure so the form can show them
    /// all at once.
    pub fn validate(&self) -> Result<BookFields, Vec<String>> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(r#""title" is required"#.to_string());
        }

        let author = self.author.trim();
        if author.is_empty() {
            errors.push(r#""author" is required"#.to_string());
        }

        let genre = self.genre.trim();

        let year = match self.year.trim() {
            "" => None,
            raw => match raw.parse::<i64>() {
                Ok(year) => Some(year),
                Err(_) => {
                    errors.push(r#""year" must be a whole number"#.to_string());
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BookFields {
            title: title.to_string(),
            author: author.to_string(),
            genre: if genre.is_empty() {
                None
            } else {
                Some(genre.to_string())
            },
            year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, author: &str, genre: &str, year: &str) -> BookForm {
        BookForm {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            year: year.to_string(),
        }
    }

    #[test]
    fn accepts_title_and_author_only() {
        let fields = form("Dune", "Frank Herbert", "", "").validate().unwrap();
        assert_eq!(fields.title, "Dune");
        assert_eq!(fields.author, "Frank Herbert");
        assert_eq!(fields.genre, None);
        assert_eq!(fields.year, None);
    }

    #[test]
    fn accepts_all_fields_and_parses_year() {
        let fields = form("Dune", "Frank Herbert", "Science Fiction", "1965")
            .validate()
            .unwrap();
        assert_eq!(fields.genre.as_deref(), Some("Science Fiction"));
        assert_eq!(fields.year, Some(1965));
    }

    #[test]
    fn rejects_empty_title() {
        let errors = form("", "Frank Herbert", "", "").validate().unwrap_err();
        assert_eq!(errors, vec![r#""title" is required"#.to_string()]);
    }

    #[test]
    fn rejects_whitespace_only_author() {
        let errors = form("Dune", "   ", "", "").validate().unwrap_err();
        assert_eq!(errors, vec![r#""author" is required"#.to_string()]);
    }

    #[test]
    fn collects_every_failure() {
        let errors = form("", "", "", "next year").validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("title"));
        assert!(errors[1].contains("author"));
        assert!(errors[2].contains("year"));
    }

    #[test]
    fn rejects_non_numeric_year() {
        let errors = form("Dune", "Frank Herbert", "", "MCMLXV")
            .validate()
            .unwrap_err();
        assert_eq!(errors, vec![r#""year" must be a whole number"#.to_string()]);
    }

    #[test]
    fn trims_stored_values() {
        let fields = form("  Dune ", " Frank Herbert ", "  ", " 1965 ")
            .validate()
            .unwrap();
        assert_eq!(fields.title, "Dune");
        assert_eq!(fields.author, "Frank Herbert");
        assert_eq!(fields.genre, None);
        assert_eq!(fields.year, Some(1965));
    }

    #[test]
    fn form_from_book_round_trips_display_values() {
        let book = Book {
            id: 7,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: None,
            year: Some(1965),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        };
        let form = BookForm::from_book(&book);
        assert_eq!(form.title, "Dune");
        assert_eq!(form.author, "Frank Herbert");
        assert_eq!(form.genre, "");
        assert_eq!(form.year, "1965");
    }
}
