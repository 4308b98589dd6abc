use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// 待写入的种子用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub name: String,
}

impl From<&NewUser> for UserDocument {
    fn from(user: &NewUser) -> Self {
        Self {
            _id: None,
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, to_document};

    #[test]
    fn new_document_serializes_without_id() {
        let document = to_document(&UserDocument::from(&NewUser::new("Alice"))).unwrap();
        assert_eq!(document, doc! { "name": "Alice" });
    }
}
