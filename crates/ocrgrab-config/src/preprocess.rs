use serde::{Deserialize, Serialize};

fn default_clahe_clip_limit() -> f32 {
    2.0
}

fn default_clahe_tile_grid() -> u32 {
    8
}

fn default_denoise_strength() -> f32 {
    10.0
}

fn default_denoise_template_window() -> u32 {
    7
}

fn default_denoise_search_window() -> u32 {
    21
}

fn default_threshold_block_size() -> u32 {
    11
}

fn default_threshold_offset() -> i32 {
    2
}

fn default_contrast_factor() -> f32 {
    2.0
}

/// Filter parameters for the handwriting and kannada chains
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PreprocessConfig {
    #[serde(default = "default_clahe_clip_limit")]
    pub clahe_clip_limit: f32,
    /// Tiles per axis
    #[serde(default = "default_clahe_tile_grid")]
    pub clahe_tile_grid: u32,
    #[serde(default = "default_denoise_strength")]
    pub denoise_strength: f32,
    #[serde(default = "default_denoise_template_window")]
    pub denoise_template_window: u32,
    #[serde(default = "default_denoise_search_window")]
    pub denoise_search_window: u32,
    #[serde(default = "default_threshold_block_size")]
    pub threshold_block_size: u32,
    #[serde(default = "default_threshold_offset")]
    pub threshold_offset: i32,
    #[serde(default = "default_contrast_factor")]
    pub contrast_factor: f32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            clahe_clip_limit: default_clahe_clip_limit(),
            clahe_tile_grid: default_clahe_tile_grid(),
            denoise_strength: default_denoise_strength(),
            denoise_template_window: default_denoise_template_window(),
            denoise_search_window: default_denoise_search_window(),
            threshold_block_size: default_threshold_block_size(),
            threshold_offset: default_threshold_offset(),
            contrast_factor: default_contrast_factor(),
        }
    }
}
