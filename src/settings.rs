use serde_derive::{Deserialize, Serialize};

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP server settings
    pub server: ServerSettings,
    /// Graph layout geometry
    pub layout: LayoutSettings,
}

/// Settings for the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Default maximum number of commits per snapshot
    pub commit_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            commit_limit: 1000,
        }
    }
}

/// Geometry used when positioning commits on the canvas.
///
/// Levels are spread over the horizontal space left between the margins,
/// slots within a level are stacked vertically at a fixed spacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Default canvas width in pixels
    pub canvas_width: f32,
    /// Default canvas height in pixels
    pub canvas_height: f32,
    /// Top margin in pixels
    pub margin_top: f32,
    /// Left margin in pixels
    pub margin_left: f32,
    /// Right margin in pixels
    pub margin_right: f32,
    /// Vertical distance between slots within a level
    pub commit_spacing: f32,
    /// Radius of a commit dot
    pub node_radius: f32,
    /// Horizontal offset of branch labels from their commit
    pub label_offset_x: f32,
    /// Vertical offset of branch labels from their commit
    pub label_offset_y: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 800.0,
            margin_top: 40.0,
            margin_left: 200.0,
            margin_right: 40.0,
            commit_spacing: 60.0,
            node_radius: 8.0,
            label_offset_x: 15.0,
            label_offset_y: -10.0,
        }
    }
}
