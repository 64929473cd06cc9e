use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{HostingPlatformService, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub version_control: Arc<dyn VersionControlService>,
    pub platform: Arc<dyn HostingPlatformService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        version_control: Arc<dyn VersionControlService>,
        platform: Arc<dyn HostingPlatformService>,
    ) -> Self {
        Self {
            config,
            version_control,
            platform,
        }
    }
}
