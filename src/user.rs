//! User record and form types.

use serde::{Deserialize, Serialize};

/// A stored user record.
///
/// `id` is a decimal-string integer assigned by the store. `name` and
/// `email` are held trimmed; `email` matched the validity pattern when it
/// was last written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// The validated, trimmed subset of fields taken from an incoming form.
///
/// Produced by the store's normalization step — a field is `Some` only
/// when the input supplied it. Create fills in both fields; partial
/// update merges whatever is present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: Option<String>,
    pub email: Option<String>,
}
