//! Session command handlers: login, registration and token refresh.

mod login;
mod refresh_identity;
mod register;

pub use login::{LoginCommand, LoginHandler, LoginResult};
pub use refresh_identity::{
    RefreshIdentityCommand, RefreshIdentityHandler, RefreshIdentityResult,
};
pub use register::{RegisterCommand, RegisterError, RegisterHandler, RegisterResult};
