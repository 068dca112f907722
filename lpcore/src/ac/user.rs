use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_ts: i64,
}
