// src/config/state.rs
use super::options::AppOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    /// URL of the page the user has open in the target application
    pub page_url: String,
    /// HAR capture to replay into the watchers
    pub har_path: String,
    /// Standing answer to the observation-permission prompt
    pub allow_observation: bool,

    pub window_w: u32,
    pub window_h: u32,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            page_url: s!(),
            har_path: s!(),
            allow_observation: false,
            window_w: 1100,
            window_h: 700,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
