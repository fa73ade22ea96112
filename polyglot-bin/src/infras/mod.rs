// Rocket-based i18n infra
pub mod i18n;
