use thiserror::Error;

use crate::errors::ErrorClass;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MissionError {
    #[error("Mission '{0}' not found")]
    MissionNotFound(String),
}

impl MissionError {
    pub fn kind(&self) -> &'static str {
        match self {
            MissionError::MissionNotFound(_) => "MISSION_NOT_FOUND",
        }
    }

    pub fn class(&self) -> ErrorClass {
        ErrorClass::NotFound
    }
}
