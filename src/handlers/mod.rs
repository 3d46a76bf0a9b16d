pub mod token_handler;

pub use token_handler::{
    logout, me, refresh_token, token_info, validate_refresh_token, validate_token,
};
