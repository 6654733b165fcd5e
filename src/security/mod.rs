pub mod token_client;

pub use token_client::{BearerToken, TokenClient, mask_token};
