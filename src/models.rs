use serde::{Deserialize, Serialize};

/// Book genre, a closed set of labels shared with the remote table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    Fantasy,
    Mystery,
    Romance,
    Thriller,
    Biography,
    History,
    Science,
    Technology,
    #[serde(rename = "Self-Help")]
    SelfHelp,
    Other,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Fiction,
        Category::NonFiction,
        Category::ScienceFiction,
        Category::Fantasy,
        Category::Mystery,
        Category::Romance,
        Category::Thriller,
        Category::Biography,
        Category::History,
        Category::Science,
        Category::Technology,
        Category::SelfHelp,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fiction => "Fiction",
            Category::NonFiction => "Non-Fiction",
            Category::ScienceFiction => "Science Fiction",
            Category::Fantasy => "Fantasy",
            Category::Mystery => "Mystery",
            Category::Romance => "Romance",
            Category::Thriller => "Thriller",
            Category::Biography => "Biography",
            Category::History => "History",
            Category::Science => "Science",
            Category::Technology => "Technology",
            Category::SelfHelp => "Self-Help",
            Category::Other => "Other",
        }
    }

    /// Exact label lookup
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == label)
    }

    fn position(&self) -> usize {
        Category::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Category {
        Category::ALL[(self.position() + 1) % Category::ALL.len()]
    }

    pub fn prev(&self) -> Category {
        let len = Category::ALL.len();
        Category::ALL[(self.position() + len - 1) % len]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editable book fields, as submitted by the book form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub category: Category,
}

/// Insert payload: a book plus the id of the user who owns it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewBook {
    #[serde(flatten)]
    pub book: Book,
    pub user_id: String,
}

/// A persisted row of the books table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub category: Category,
    pub user_id: String,
    pub created_at: String,
}

impl BookRecord {
    pub fn to_book(&self) -> Book {
        Book {
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year,
            category: self.category,
        }
    }
}

/// Row ids are opaque; bigint keys arrive as JSON numbers
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Sign-up form payload
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignUpData {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign-in form payload
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignInData {
    pub email: String,
    pub password: String,
}

/// Password change payload
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangePasswordData {
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Authenticated user identity as reported by the auth service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Live session; kept in memory only
#[derive(Clone, Debug, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}
