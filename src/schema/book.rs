//! Book schema

use chrono::Datelike;

use crate::models::{Book, Category};
use crate::schema::{Field, FieldErrors, Schema};

/// Raw book form contents; year is still text and category may be unset
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub year: String,
    pub category: Option<Category>,
}

impl BookInput {
    /// Validate against an explicit "current year"
    pub fn validate_at(&self, current_year: i32) -> Result<Book, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.title.is_empty() {
            errors.insert(Field::Title, "Title is required");
        }
        if self.author.is_empty() {
            errors.insert(Field::Author, "Author is required");
        }
        let year = check_year(&mut errors, self.year.trim(), current_year);
        if self.category.is_none() {
            errors.insert(Field::Category, "Category is required");
        }

        match (year, self.category) {
            (Some(year), Some(category)) if errors.is_empty() => Ok(Book {
                title: self.title.clone(),
                author: self.author.clone(),
                year,
                category,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&Book> for BookInput {
    fn from(book: &Book) -> Self {
        BookInput {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.to_string(),
            category: Some(book.category),
        }
    }
}

impl Schema for BookInput {
    type Output = Book;

    fn validate(&self) -> Result<Book, FieldErrors> {
        self.validate_at(chrono::Local::now().year())
    }
}

fn check_year(errors: &mut FieldErrors, raw: &str, current_year: i32) -> Option<i32> {
    if raw.is_empty() {
        errors.insert(Field::Year, "Year is required");
        return None;
    }
    let value = match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            errors.insert(Field::Year, "Year must be a number");
            return None;
        }
    };
    if value < 0.0 {
        errors.insert(Field::Year, "Year must be a non-negative number");
    } else if value.fract() != 0.0 {
        errors.insert(Field::Year, "Year must be an integer");
    } else if value > f64::from(current_year) {
        errors.insert(Field::Year, "Year cannot be in the future");
    } else {
        // 0 <= value <= current_year, so the cast is lossless
        return Some(value as i32);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const NOW: i32 = 2025;

    fn input(title: &str, author: &str, year: &str, category: Option<Category>) -> BookInput {
        BookInput {
            title: title.into(),
            author: author.into(),
            year: year.into(),
            category,
        }
    }

    #[test]
    fn accepts_complete_book() {
        let book = input("Dune", "Herbert", "1965", Some(Category::ScienceFiction))
            .validate_at(NOW)
            .unwrap();
        assert_eq!(
            book,
            Book {
                title: "Dune".into(),
                author: "Herbert".into(),
                year: 1965,
                category: Category::ScienceFiction,
            }
        );
    }

    #[rstest]
    #[case("", "Year is required")]
    #[case("abc", "Year must be a number")]
    #[case("-1", "Year must be a non-negative number")]
    #[case("1999.5", "Year must be an integer")]
    #[case("2026", "Year cannot be in the future")]
    #[case("inf", "Year must be a number")]
    fn year_rules(#[case] year: &str, #[case] message: &str) {
        let errors = input("t", "a", year, Some(Category::Other))
            .validate_at(NOW)
            .unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec![Field::Year]);
        assert_eq!(errors.get(Field::Year), Some(message));
    }

    #[rstest]
    #[case("0")]
    #[case("2025")]
    #[case(" 1815 ")]
    fn year_bounds_are_inclusive(#[case] year: &str) {
        assert!(input("t", "a", year, Some(Category::Other)).validate_at(NOW).is_ok());
    }

    #[test]
    fn every_missing_field_is_reported_once() {
        let errors = BookInput::default().validate_at(NOW).unwrap_err();
        assert_eq!(
            errors.keys().collect::<Vec<_>>(),
            vec![Field::Title, Field::Author, Field::Year, Field::Category]
        );
        assert_eq!(errors.get(Field::Category), Some("Category is required"));
    }

    #[test]
    fn round_trips_existing_book_into_form_input() {
        let book = Book {
            title: "Emma".into(),
            author: "Austen".into(),
            year: 1815,
            category: Category::Fiction,
        };
        assert_eq!(BookInput::from(&book).validate_at(NOW), Ok(book));
    }
}
