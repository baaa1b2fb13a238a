//! Request validation.
//!
//! Credentials are checked with the same rules at signup and signin, and
//! every failing rule is reported, not just the first.

use validator::{Validate, ValidationError, ValidationErrors};

use crate::db::schema::{ContentCreate, ContentKind};
use crate::error::BrainError;
use crate::types::{ContentId, Username};

pub const USERNAME_LENGTH_MESSAGE: &str = "Username must be between 3 and 10 characters long";
pub const PASSWORD_LENGTH_MESSAGE: &str = "Password must be between 8 and 20 characters long";
pub const PASSWORD_COMPOSITION_MESSAGE: &str = "Password must contain at least one uppercase letter, one lowercase letter, one digit, and one special character";

/// Username and password as submitted by the client.
#[derive(Debug, Clone, Validate)]
pub struct Credentials {
    #[validate(length(min = 3, max = 10, message = "Username must be between 3 and 10 characters long"))]
    username: String,
    #[validate(
        length(min = 8, max = 20, message = "Password must be between 8 and 20 characters long"),
        custom(function = "validate_password_composition")
    )]
    password: String,
}

fn validate_password_composition(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if has_upper && has_lower && has_digit && has_symbol {
        Ok(())
    } else {
        let mut err = ValidationError::new("composition");
        err.message = Some(PASSWORD_COMPOSITION_MESSAGE.into());
        Err(err)
    }
}

impl Credentials {
    /// Build credentials from optional request fields.
    ///
    /// Missing or empty fields short-circuit with [`BrainError::MissingFields`]
    /// before any format rule is applied.
    pub fn from_parts(
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, BrainError> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                let creds = Self { username, password };
                creds.validate().map_err(|e| BrainError::Validation(messages(&e)))?;
                Ok(creds)
            }
            _ => Err(BrainError::MissingFields(
                "Username or Password field cannot be empty".to_string(),
            )),
        }
    }

    pub fn username(&self) -> Username {
        Username::new(self.username.clone())
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Content fields as submitted by the client.
#[derive(Debug, Clone, Validate)]
struct ContentInput {
    #[validate(url(message = "Link must be a valid URL"))]
    link: String,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    title: String,
}

/// Build a validated content payload from optional request fields.
pub fn content_from_parts(
    kind: Option<String>,
    link: Option<String>,
    title: Option<String>,
    tags: Option<Vec<String>>,
) -> Result<ContentCreate, BrainError> {
    let (Some(kind), Some(link), Some(title)) = (kind, link, title) else {
        return Err(BrainError::MissingFields(
            "type, link and title are required".to_string(),
        ));
    };

    let input = ContentInput {
        link: link.trim().to_string(),
        title: title.trim().to_string(),
    };

    let mut problems = match input.validate() {
        Ok(()) => Vec::new(),
        Err(e) => messages(&e),
    };

    let kind = match kind.parse::<ContentKind>() {
        Ok(kind) => Some(kind),
        Err(msg) => {
            problems.push(msg);
            None
        }
    };

    match kind {
        Some(kind) if problems.is_empty() => Ok(ContentCreate {
            link: input.link,
            kind,
            title: input.title,
            tags: tags.unwrap_or_default(),
        }),
        _ => Err(BrainError::Validation(problems)),
    }
}

/// Require a content id in a request body.
pub fn content_id_from_part(content_id: Option<String>) -> Result<ContentId, BrainError> {
    match content_id {
        Some(id) if !id.trim().is_empty() => Ok(ContentId::new(id.trim())),
        _ => Err(BrainError::MissingFields("contentId is required".to_string())),
    }
}

/// Flatten validation errors into their messages, ordered by field name.
fn messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .collect()
}
