pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid {option}: {value}. Permissible: {permissible}, or a #rgb / #rrggbb hex color")]
    InvalidColor {
        option: String,
        value: String,
        permissible: String,
    },

    #[error("Invalid option {option}: {message}")]
    InvalidOption { option: String, message: String },

    #[error("Invalid config JSON: {message}")]
    InvalidConfigJson { message: String },

    #[error("Invalid config YAML: {message}")]
    InvalidConfigYaml { message: String },

    #[error("Invalid relation table: {message}")]
    InvalidTable { message: String },
}
