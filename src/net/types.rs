//! Resource DTOs for the LanguageBooster API.
//!
//! DESIGN
//! ======
//! Plain value records mirroring the API's JSON. Field names are camelCase on
//! the wire. `Space.users` and `Space.projects` are not always populated by the
//! API; missing arrays decode as empty so both the nested and the flat payload
//! shapes are accepted.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// An authenticated user as returned by `/users/current`, `/users/login` and
/// `/users/create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login name.
    pub username: String,
}

/// A translation project, owned by a space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub name: String,
    /// Containing space. Older payloads omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<i64>,
}

/// A workspace grouping users and projects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub name: String,
    /// Members of the space. Empty when the API did not populate it.
    #[serde(default)]
    pub users: Vec<User>,
    /// Projects in the space. Empty when the API did not populate it.
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// A target language of a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub project_id: i64,
}

/// A translatable string key and its per-language values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub key: String,
    pub status: String,
    /// Translated values, in API order.
    #[serde(default)]
    pub values: Vec<MutationValue>,
}

/// One language's translation of a [`Mutation`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationValue {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub value: String,
    pub status: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub language_id: i64,
}

/// Body of `POST /users/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /users/create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Accepts integer ids and integral floats (`1.0`), rejecting anything else.
fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= i64::MIN as f64
                && float < i64::MAX as f64
            {
                return Ok(float as i64);
            }
            Err(D::Error::custom("expected integer id"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}
