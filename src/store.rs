//! User store and validation.
//!
//! The store owns the ordered record collection and every rule about what
//! may enter it: key presence, runtime type, trimming, email format, id
//! assignment. Checks run in a fixed order — presence before type, type
//! before format — so when an input has several problems the first check
//! decides the message.

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use regex::Regex;
use serde_json::Value;

use crate::error::UserError;
use crate::user::{User, UserForm};

/// An unvalidated input payload, keyed by field name.
///
/// Kept loosely typed on purpose: presence and runtime type are part of the
/// validation contract, so the store inspects a raw JSON object rather than
/// letting a deserializer reject the whole payload with its own message.
pub type Form = serde_json::Map<String, Value>;

const EMAIL_CONTRACT: &str = "Either form.email or email must be provided";

/// The in-memory user collection.
///
/// Insertion order is preserved; records are never re-sorted. One instance
/// is constructed per process and shared with the routing layer behind an
/// `Arc`. The mutex is held only across a single synchronous operation —
/// there are no await points while locked.
pub struct UserStore {
    users: Mutex<Vec<User>>,
}

impl UserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self { users: Mutex::new(Vec::new()) }
    }

    fn users(&self) -> MutexGuard<'_, Vec<User>> {
        // Store operations do not panic while holding the guard, so a
        // poisoned lock still protects a consistent collection.
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All records, in insertion order.
    pub fn list(&self) -> Vec<User> {
        self.users().clone()
    }

    /// The record whose id equals `id`, or [`UserError::NotFound`].
    pub fn get(&self, id: &str) -> Result<User, UserError> {
        let users = self.users();
        let idx = position(&users, id)?;
        Ok(users[idx].clone())
    }

    /// Validates `form`, assigns a fresh id, appends the record, returns it.
    ///
    /// Presence is checked by key, not truthiness: an explicit `""` passes
    /// the presence check and fails downstream instead.
    pub fn create(&self, form: &Form) -> Result<User, UserError> {
        if !form.contains_key("name") {
            return Err(UserError::form("Missing name"));
        }
        if !form.contains_key("email") {
            return Err(UserError::form("Missing email"));
        }

        let normalized = preprocess(form, None)?;

        let mut users = self.users();
        let user = User {
            id: next_id(&users),
            name: normalized.name.unwrap_or_default(),
            email: normalized.email.unwrap_or_default(),
        };
        users.push(user.clone());
        Ok(user)
    }

    /// Merges the supplied fields into the record with the given id.
    ///
    /// The record's current email serves as fallback context for
    /// validation, so a name-only update never has to re-submit the email.
    /// Only supplied fields are written; the id never changes.
    pub fn update(&self, id: &str, form: &Form) -> Result<User, UserError> {
        let mut users = self.users();
        let idx = position(&users, id)?;

        let normalized = preprocess(form, Some(&users[idx].email))?;

        let user = &mut users[idx];
        if let Some(name) = normalized.name {
            user.name = name;
        }
        if let Some(email) = normalized.email {
            user.email = email;
        }
        Ok(user.clone())
    }

    /// Removes the record with the given id, or fails with
    /// [`UserError::NotFound`].
    pub fn delete(&self, id: &str) -> Result<(), UserError> {
        let mut users = self.users();
        let idx = position(&users, id)?;
        users.remove(idx);
        Ok(())
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of the record whose id equals `id`. Exact string comparison —
/// no numeric coercion, `"07"` never matches `"7"`.
fn position(users: &[User], id: &str) -> Result<usize, UserError> {
    users.iter().position(|u| u.id == id).ok_or(UserError::NotFound)
}

/// Next record id: the highest numeric id in the collection plus one, as a
/// decimal string. Recomputed from the records on each call, not kept as a
/// counter.
fn next_id(users: &[User]) -> String {
    let max = users
        .iter()
        .filter_map(|u| u.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

/// Normalizes a form into the validated subset of supplied fields.
///
/// Each supplied field must be a JSON string (name checked before email)
/// and is trimmed. The email to validate is the trimmed input email when
/// supplied, else `fallback_email`; having neither is a caller bug, not a
/// user error. The resolved email must match the validity pattern.
fn preprocess(form: &Form, fallback_email: Option<&str>) -> Result<UserForm, UserError> {
    let mut normalized = UserForm::default();

    if let Some(value) = supplied(form, "name") {
        let name = value
            .as_str()
            .ok_or_else(|| UserError::form("Name must be a string"))?;
        normalized.name = Some(name.trim().to_owned());
    }
    if let Some(value) = supplied(form, "email") {
        let email = value
            .as_str()
            .ok_or_else(|| UserError::form("Email must be a string"))?;
        normalized.email = Some(email.trim().to_owned());
    }

    let resolved = normalized
        .email
        .as_deref()
        .or(fallback_email)
        .ok_or(UserError::Contract(EMAIL_CONTRACT))?;
    if !is_valid_email(resolved) {
        return Err(UserError::form("Invalid email"));
    }

    Ok(normalized)
}

/// A field counts as supplied when its key is present and the value is
/// neither JSON `null` nor the empty string.
fn supplied<'a>(form: &'a Form, key: &str) -> Option<&'a Value> {
    match form.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(value),
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
});

/// Simple `local@domain.tld` check, case-insensitive.
fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form(value: Value) -> Form {
        value.as_object().cloned().expect("object literal")
    }

    fn record(id: &str) -> User {
        User {
            id: id.to_owned(),
            name: "x".to_owned(),
            email: "x@company.com".to_owned(),
        }
    }

    fn seeded() -> UserStore {
        let store = UserStore::new();
        store
            .create(&form(json!({"name": "John", "email": "john@company.com"})))
            .unwrap();
        store
            .create(&form(json!({"name": "Jane", "email": "jane@company.com"})))
            .unwrap();
        store
    }

    // ── id assignment ─────────────────────────────────────────────────────────

    #[test]
    fn next_id_is_one_for_an_empty_collection() {
        assert_eq!(next_id(&[]), "1");
    }

    #[test]
    fn next_id_is_max_plus_one_regardless_of_order() {
        let users = vec![record("2"), record("5"), record("3")];
        assert_eq!(next_id(&users), "6");
    }

    #[test]
    fn deleting_the_highest_id_frees_it_for_reuse() {
        let store = seeded();
        store.delete("2").unwrap();
        let user = store
            .create(&form(json!({"name": "Jim", "email": "jim@company.com"})))
            .unwrap();
        assert_eq!(user.id, "2");
    }

    // ── lookup ────────────────────────────────────────────────────────────────

    #[test]
    fn get_returns_the_matching_record() {
        let store = seeded();
        let user = store.get("1").unwrap();
        assert_eq!(user.name, "John");
    }

    #[test]
    fn get_fails_for_a_plausible_but_unmatched_id() {
        let store = seeded();
        assert_eq!(store.get("77").unwrap_err(), UserError::NotFound);
    }

    #[test]
    fn lookup_is_exact_string_comparison() {
        let store = seeded();
        assert_eq!(store.get("01").unwrap_err(), UserError::NotFound);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = seeded();
        let names: Vec<_> = store.list().into_iter().map(|u| u.name).collect();
        assert_eq!(names, ["John", "Jane"]);
    }

    // ── create validation ─────────────────────────────────────────────────────

    #[test]
    fn create_requires_the_name_key() {
        let store = UserStore::new();
        let err = store
            .create(&form(json!({"email": "jim@company.com"})))
            .unwrap_err();
        assert_eq!(err, UserError::form("Missing name"));
    }

    #[test]
    fn create_requires_the_email_key() {
        let store = UserStore::new();
        let err = store.create(&form(json!({"name": "Jim"}))).unwrap_err();
        assert_eq!(err, UserError::form("Missing email"));
    }

    #[test]
    fn missing_name_wins_over_an_invalid_email_type() {
        let store = UserStore::new();
        let err = store.create(&form(json!({"email": 5}))).unwrap_err();
        assert_eq!(err, UserError::form("Missing name"));
    }

    #[test]
    fn missing_email_wins_over_an_invalid_name_type() {
        let store = UserStore::new();
        let err = store.create(&form(json!({"name": 5}))).unwrap_err();
        assert_eq!(err, UserError::form("Missing email"));
    }

    #[test]
    fn name_type_is_checked_before_email_format() {
        let store = UserStore::new();
        let err = store
            .create(&form(json!({"name": 5, "email": "not-an-email"})))
            .unwrap_err();
        assert_eq!(err, UserError::form("Name must be a string"));
    }

    #[test]
    fn non_string_email_is_rejected_by_type() {
        let store = UserStore::new();
        let err = store
            .create(&form(json!({"name": "Jim", "email": ["jim@company.com"]})))
            .unwrap_err();
        assert_eq!(err, UserError::form("Email must be a string"));
    }

    #[test]
    fn create_trims_name_and_email() {
        let store = UserStore::new();
        let user = store
            .create(&form(json!({"name": "  Jim  ", "email": "  jim@company.com  "})))
            .unwrap();
        assert_eq!(user.name, "Jim");
        assert_eq!(user.email, "jim@company.com");
        assert_eq!(store.get(&user.id).unwrap().email, "jim@company.com");
    }

    #[test]
    fn create_with_an_empty_email_is_a_contract_violation() {
        // The key is present, so the presence check passes; normalization
        // then resolves no email at all.
        let store = UserStore::new();
        let err = store
            .create(&form(json!({"name": "Jim", "email": ""})))
            .unwrap_err();
        assert!(matches!(err, UserError::Contract(_)));
    }

    #[test]
    fn email_validity_cases() {
        let store = UserStore::new();
        for email in ["jim@company.com", "jim@company.tech", "Jim@COMPANY.Com"] {
            assert!(
                store.create(&form(json!({"name": "Jim", "email": email}))).is_ok(),
                "expected {email} to be accepted"
            );
        }
        for email in ["jim@domain", "jimmy", "jim@@company.com", "@company.com", "jim@.c"] {
            let err = store
                .create(&form(json!({"name": "Jim", "email": email})))
                .unwrap_err();
            assert_eq!(err, UserError::form("Invalid email"), "for input {email}");
        }
    }

    #[test]
    fn failed_create_does_not_mutate_the_collection() {
        let store = seeded();
        let _ = store.create(&form(json!({"name": "Jim", "email": "bad"})));
        assert_eq!(store.list().len(), 2);
    }

    // ── update ────────────────────────────────────────────────────────────────

    #[test]
    fn update_with_name_only_leaves_email_and_id_untouched() {
        let store = seeded();
        let user = store.update("1", &form(json!({"name": "Jim"}))).unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.name, "Jim");
        assert_eq!(user.email, "john@company.com");
    }

    #[test]
    fn update_trims_the_supplied_fields() {
        let store = seeded();
        let user = store.update("1", &form(json!({"name": "  Jim  "}))).unwrap();
        assert_eq!(user.name, "Jim");
        assert_eq!(store.get("1").unwrap().name, "Jim");
    }

    #[test]
    fn update_validates_a_supplied_email() {
        let store = seeded();
        let err = store
            .update("1", &form(json!({"email": "jim@domain"})))
            .unwrap_err();
        assert_eq!(err, UserError::form("Invalid email"));
        assert_eq!(store.get("1").unwrap().email, "john@company.com");
    }

    #[test]
    fn update_with_an_empty_form_returns_the_record_unchanged() {
        // The stored email provides the fallback context, so nothing fails
        // and nothing changes.
        let store = seeded();
        let user = store.update("1", &Form::new()).unwrap();
        assert_eq!(user, store.get("1").unwrap());
    }

    #[test]
    fn update_fails_for_an_unknown_id() {
        let store = seeded();
        let err = store.update("77", &form(json!({"name": "Jim"}))).unwrap_err();
        assert_eq!(err, UserError::NotFound);
    }

    // ── delete ────────────────────────────────────────────────────────────────

    #[test]
    fn delete_removes_the_record() {
        let store = seeded();
        store.delete("1").unwrap();
        assert_eq!(store.get("1").unwrap_err(), UserError::NotFound);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn delete_fails_for_an_unknown_id() {
        let store = seeded();
        assert_eq!(store.delete("77").unwrap_err(), UserError::NotFound);
    }
}
