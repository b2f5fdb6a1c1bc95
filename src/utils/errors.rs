use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("Could not create media engine instance")]
    EngineCreate,

    #[error("Could not initialize media engine: {0}")]
    EngineInit(String),

    #[error("Failed to create render context: {0}")]
    RenderContext(String),

    #[error("Command '{command}' failed: {reason}")]
    Command { command: String, reason: String },

    #[error("Failed to set property '{name}': {reason}")]
    Property { name: String, reason: String },

    #[error("Invalid media reference: {0}")]
    InvalidReference(String),
}

impl PlayerError {
    pub fn command(command: &str, reason: impl Into<String>) -> Self {
        Self::Command {
            command: command.to_string(),
            reason: reason.into(),
        }
    }

    pub fn property(name: &str, reason: impl Into<String>) -> Self {
        Self::Property {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors after which no degraded playback mode exists.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PlayerError::EngineCreate | PlayerError::EngineInit(_) | PlayerError::RenderContext(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(PlayerError::EngineCreate.is_fatal());
        assert!(PlayerError::EngineInit("no vo".into()).is_fatal());
        assert!(PlayerError::RenderContext("MPV_ERROR_UNSUPPORTED".into()).is_fatal());

        assert!(!PlayerError::command("loadfile", "loading failed").is_fatal());
        assert!(!PlayerError::property("volume", "invalid format").is_fatal());
        assert!(!PlayerError::InvalidReference("a\0b".into()).is_fatal());
    }

    #[test]
    fn test_command_error_message() {
        let err = PlayerError::command("loadfile", "unrecognized file format");
        assert_eq!(
            err.to_string(),
            "Command 'loadfile' failed: unrecognized file format"
        );
    }
}
