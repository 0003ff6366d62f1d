pub mod provider;
pub mod provider_user_info;

pub use provider::{Provider, UnknownProvider};
pub use provider_user_info::{ProviderToken, ProviderUserInfo};
