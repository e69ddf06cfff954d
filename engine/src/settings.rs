use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct GameSettings {
    pub grid_size: usize,
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 2 || self.grid_size > 10 {
            return Err(format!(
                "Grid size must be between 2 and 10, got {}",
                self.grid_size
            ));
        }
        Ok(())
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        let settings: Self = serde_yaml_ng::from_str(content)
            .map_err(|e| format!("Failed to deserialize settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml_ng::to_string(self).map_err(|e| format!("Failed to serialize settings: {}", e))
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self { grid_size: 4 }
    }
}
