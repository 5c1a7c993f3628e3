use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid urbanization rate {value} for {province}: expected a percentage")]
    InvalidUrbanizationRate { province: String, value: f64 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
