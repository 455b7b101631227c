pub mod appcenter;
pub mod download;
pub mod installer;
pub mod settings;
