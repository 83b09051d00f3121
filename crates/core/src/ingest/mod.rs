pub mod naver;
pub mod provider;
pub mod types;
