use serde::{Deserialize, Serialize};
use snap_types::CaptureRegion;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CaptureConfig {
    /// Screen region to grab, whole primary monitor when absent
    pub region: Option<CaptureRegion>,
}
