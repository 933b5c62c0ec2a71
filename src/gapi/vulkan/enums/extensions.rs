use vulkanalia::{vk, Version};

crate::enum_impl! {
    /// # Vulkan Instance Extensions
    ///
    /// Instance extensions must be enabled during `vkCreateInstance`. They typically deal with
    /// window system integration (WSI) or debugging features.
    ///
    /// Only the extensions this crate itself asks for are listed here; the window system
    /// reports its own surface extensions (e.g. `VK_KHR_xcb_surface`) as raw names.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum InstanceExtension {
        /// # VK_EXT_debug_utils
        /// Debug-messenger control and object naming. Needed to route validation messages
        /// into our logger.
        ExtDebugUtils = vk::EXT_DEBUG_UTILS_EXTENSION.name,
        /// # VK_KHR_get_physical_device_properties2
        /// Extended querying for physical-device features and properties.
        /// Promoted to core in Vulkan 1.1; still needed for portability drivers.
        KhrGetPhysicalDeviceProperties2 = vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name,
        /// # VK_KHR_portability_enumeration
        /// Makes `vkEnumeratePhysicalDevices` return portability-subset devices (MoltenVK).
        KhrPortabilityEnumeration = vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name,
    }
}

crate::enum_impl! {
    /// # Vulkan Device Extensions
    ///
    /// Device extensions must be enabled during `vkCreateDevice`. A physical device is only
    /// considered suitable if it reports every extension the configuration requires.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum DeviceExtension {
        /// Required for presenting images to a surface
        KhrSwapchain = vk::KHR_SWAPCHAIN_EXTENSION.name,
        /// SPIR-V 1.4 shader modules
        KhrSpirv14 = vk::KHR_SPIRV_1_4_EXTENSION.name,
        /// Simplified pipeline barriers and submission
        KhrSynchronization2 = vk::KHR_SYNCHRONIZATION2_EXTENSION.name,
        /// Extensible render pass creation
        KhrCreateRenderpass2 = vk::KHR_CREATE_RENDERPASS2_EXTENSION.name,
        /// Viewport, scissor, cull mode etc. set at record time
        ExtExtendedDynamicState = vk::EXT_EXTENDED_DYNAMIC_STATE_EXTENSION.name,
        /// Portability subset (MoltenVK etc.)
        KhrPortabilitySubset = vk::KHR_PORTABILITY_SUBSET_EXTENSION.name,
    }
}

/// Required by Vulkan SDK on macOS since 1.3.216.
pub(crate) const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_the_registry_strings() {
        assert_eq!(DeviceExtension::KhrSwapchain.name(), "VK_KHR_swapchain");
        assert_eq!(
            DeviceExtension::ExtExtendedDynamicState.to_string(),
            "VK_EXT_extended_dynamic_state"
        );
        assert_eq!(InstanceExtension::ExtDebugUtils.name(), "VK_EXT_debug_utils");
    }
}
