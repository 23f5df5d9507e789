pub mod logo_store;

pub use logo_store::{LogoStore, LogoUpload};
