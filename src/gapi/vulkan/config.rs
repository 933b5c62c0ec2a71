use crate::gapi::vulkan::enums::extensions::DeviceExtension;
use vulkanalia::vk;

pub(crate) const VALIDATION_ENABLED: bool = cfg!(feature = "validation");
pub(crate) const API_DUMP_ENABLED: bool = cfg!(feature = "api_dump");

/// Construction-time configuration of the negotiation pipeline.
///
/// Components receive this explicitly instead of reading the compile-time toggles, so the whole
/// pipeline is determined by its inputs.
#[derive(Debug, Clone)]
pub struct VulkanConfig {
    /// Enables the validation layer, `VK_EXT_debug_utils` and the debug messenger.
    pub validation: bool,
    /// Adds the LunarG API dump layer to the layer wishlist.
    pub api_dump: bool,
    /// Lowest physical device API version accepted (packed with [`vk::make_version`]).
    pub min_api_version: u32,
    /// Every device extension a physical device must report to be selected.
    pub device_extensions: Vec<DeviceExtension>,
}

impl VulkanConfig {
    /// Defaults driven by the crate's Cargo features (`validation`, `api_dump`).
    pub fn from_features() -> Self {
        Self {
            validation: VALIDATION_ENABLED,
            api_dump: API_DUMP_ENABLED,
            ..Self::default()
        }
    }
}

impl Default for VulkanConfig {
    fn default() -> Self {
        Self {
            validation: false,
            api_dump: false,
            // Dynamic rendering is core from 1.3 onwards.
            min_api_version: vk::make_version(1, 3, 0),
            device_extensions: vec![
                DeviceExtension::KhrSwapchain,
                DeviceExtension::KhrSpirv14,
                DeviceExtension::KhrSynchronization2,
                DeviceExtension::KhrCreateRenderpass2,
                DeviceExtension::ExtExtendedDynamicState,
            ],
        }
    }
}
