pub mod filtered_user;
pub mod token_claims;
pub mod uuid;
