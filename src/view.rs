use crate::model::{Book, BookForm};

/// Escapes a value for interpolation into HTML text or attributes.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
    <meta charset="utf-8">
    <title>{}</title>
    <link rel="stylesheet" href="/static/stylesheets/style.css">
</head>
<body>
    <div class="wrap">
        <h1><a href="/books">Library</a></h1>
{}
    </div>
</body>
</html>
"#,
        escape(title),
        body
    )
}

fn alert(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let mut items = String::new();
    for message in errors {
        items.push_str(&format!("            <li>{}</li>\n", escape(message)));
    }

    format!(
        r#"        <div class="alert">
            <p>The book could not be saved:</p>
            <ul>
{}            </ul>
        </div>
"#,
        items
    )
}

fn form_fields(form: &BookForm) -> String {
    format!(
        r#"            <p>
                <label for="title">Title</label>
                <input type="text" id="title" name="title" value="{}">
            </p>
            <p>
                <label for="author">Author</label>
                <input type="text" id="author" name="author" value="{}">
            </p>
            <p>
                <label for="genre">Genre</label>
                <input type="text" id="genre" name="genre" value="{}">
            </p>
            <p>
                <label for="year">Year</label>
                <input type="text" id="year" name="year" value="{}">
            </p>
"#,
        escape(&form.title),
        escape(&form.author),
        escape(&form.genre),
        escape(&form.year)
    )
}

pub fn book_list_page(books: &[Book], term: &str) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        r#"        <form action="/" method="post" class="search">
            <input type="text" name="search" value="{}" placeholder="Search by title, author, genre or year">
            <button type="submit">Search</button>
        </form>
        <p><a href="/books/new" class="button">Add a book</a></p>
"#,
        escape(term)
    ));

    if books.is_empty() {
        body.push_str("        <p class=\"empty\">No books found.</p>\n");
        return layout("Books", &body);
    }

    body.push_str(
        r#"        <table>
            <tr>
                <th>Title</th>
                <th>Author</th>
                <th>Genre</th>
                <th>Year</th>
                <th></th>
            </tr>
"#,
    );

    for book in books {
        let genre = book.genre.as_deref().unwrap_or("");
        let year = book.year.map(|y| y.to_string()).unwrap_or_default();
        body.push_str(&format!(
            r#"            <tr>
                <td><a href="/books/{id}">{title}</a></td>
                <td>{author}</td>
                <td>{genre}</td>
                <td>{year}</td>
                <td>
                    <form action="/books/{id}/delete" method="post">
                        <button type="submit" class="danger">Delete</button>
                    </form>
                </td>
            </tr>
"#,
            id = book.id,
            title = escape(&book.title),
            author = escape(&book.author),
            genre = escape(genre),
            year = year
        ));
    }

    body.push_str("        </table>\n");
    layout("Books", &body)
}

pub fn new_book_page(form: &BookForm, errors: &[String]) -> String {
    let body = format!(
        r#"        <h2>New Book</h2>
{}        <form action="/books/new" method="post">
{}            <p><button type="submit">Create Book</button></p>
        </form>
"#,
        alert(errors),
        form_fields(form)
    );
    layout("New Book", &body)
}

pub fn edit_book_page(id: i64, form: &BookForm, errors: &[String]) -> String {
    let body = format!(
        r#"        <h2>Update Book</h2>
{alert}        <form action="/books/{id}" method="post">
{fields}            <p><button type="submit">Update Book</button></p>
        </form>
        <form action="/books/{id}/delete" method="post">
            <p><button type="submit" class="danger">Delete Book</button></p>
        </form>
"#,
        alert = alert(errors),
        id = id,
        fields = form_fields(form)
    );
    layout("Update Book", &body)
}

pub fn not_found_page() -> String {
    layout(
        "Page Not Found",
        r#"        <h2>Page Not Found</h2>
        <p>The page you were looking for does not exist.</p>
        <p><a href="/books">Back to the catalog</a></p>
"#,
    )
}

pub fn error_page() -> String {
    layout(
        "Server Error",
        r#"        <h2>Server Error</h2>
        <p>Something went wrong. Please try again.</p>
"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str, author: &str, genre: Option<&str>, year: Option<i64>) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.map(|g| g.to_string()),
            year,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn escape_replaces_special_characters() {
        assert_eq!(
            escape(r#"<b>"Bell & Sons'"</b>"#),
            "&lt;b&gt;&quot;Bell &amp; Sons&#39;&quot;&lt;/b&gt;"
        );
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn list_page_links_each_book() {
        let books = vec![
            book(1, "Dune", "Frank Herbert", Some("Science Fiction"), Some(1965)),
            book(2, "Beloved", "Toni Morrison", None, None),
        ];
        let page = book_list_page(&books, "");

        assert!(page.contains(r#"<a href="/books/1">Dune</a>"#));
        assert!(page.contains(r#"<a href="/books/2">Beloved</a>"#));
        assert!(page.contains(r#"action="/books/1/delete""#));
        assert!(page.contains("Science Fiction"));
        assert!(page.contains("1965"));
    }

    #[test]
    fn list_page_escapes_titles() {
        let books = vec![book(1, "Hansel & Gretel", "Brothers Grimm", None, None)];
        let page = book_list_page(&books, "");

        assert!(page.contains("Hansel &amp; Gretel"));
        assert!(!page.contains("Hansel & Gretel"));
    }

    #[test]
    fn list_page_echoes_search_term() {
        let page = book_list_page(&[], "tolkien");
        assert!(page.contains(r#"name="search" value="tolkien""#));
    }

    #[test]
    fn list_page_escapes_search_term() {
        let page = book_list_page(&[], r#""><script>"#);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn empty_list_page_shows_placeholder() {
        let page = book_list_page(&[], "");
        assert!(page.contains("No books found."));
        assert!(!page.contains("<table>"));
    }

    #[test]
    fn new_page_without_errors_has_no_alert() {
        let page = new_book_page(&BookForm::default(), &[]);
        assert!(page.contains(r#"action="/books/new""#));
        assert!(!page.contains("class=\"alert\""));
    }

    #[test]
    fn new_page_with_errors_keeps_submitted_values() {
        let form = BookForm {
            title: String::new(),
            author: "Frank Herbert".to_string(),
            genre: "Science Fiction".to_string(),
            year: "1965".to_string(),
        };
        let errors = vec![r#""title" is required"#.to_string()];
        let page = new_book_page(&form, &errors);

        assert!(page.contains("class=\"alert\""));
        assert!(page.contains("&quot;title&quot; is required"));
        assert!(page.contains(r#"value="Frank Herbert""#));
        assert!(page.contains(r#"value="1965""#));
    }

    #[test]
    fn edit_page_posts_to_book_id() {
        let form = BookForm {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: String::new(),
            year: String::new(),
        };
        let page = edit_book_page(7, &form, &[]);

        assert!(page.contains(r#"action="/books/7""#));
        assert!(page.contains(r#"action="/books/7/delete""#));
        assert!(page.contains(r#"value="Dune""#));
    }

    #[test]
    fn status_pages_name_their_condition() {
        assert!(not_found_page().contains("Page Not Found"));
        assert!(error_page().contains("Server Error"));
    }
}
