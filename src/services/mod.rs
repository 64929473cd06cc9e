pub mod hosting_platform;
pub mod version_control;

pub use hosting_platform::HostingPlatformService;
pub use version_control::VersionControlService;
