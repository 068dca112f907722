use serde::{Deserialize, Serialize};
use super::user::User;

/// The actor behind a request, as supplied by whatever authenticated
/// the request.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum Agent {
    #[default]
    Anonymous,
    User(User),
}

mod impls;
