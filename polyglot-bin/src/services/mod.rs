// i18n API calls
pub mod i18n;
