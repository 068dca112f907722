pub mod agent;
pub mod traits;
pub mod user;

pub use self::{
    agent::Agent,
    user::User,
};
