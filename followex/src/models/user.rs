use serde::{Deserialize, Serialize};

/// The account a follower list is requested for, as returned by the
/// username lookup. Ids are decimal strings on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
}
