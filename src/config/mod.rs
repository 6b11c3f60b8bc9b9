pub mod engines;
pub mod yml_settings;

pub use engines::EngineCatalog;
pub use yml_settings::EngineSettings;
