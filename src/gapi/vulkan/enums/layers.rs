use vulkanalia::vk;

crate::enum_impl! {
    /// # Vulkan Layers
    ///
    /// Layers are optional components that intercept Vulkan calls and attach behavior to them.
    /// They are installed on the system and enabled during instance creation, so they can be
    /// switched on for development and left out of release builds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum InstanceLayer {
        /// # `VK_LAYER_KHRONOS_validation`
        /// The all-in-one validation layer maintained by Khronos. Pair with
        /// `VK_EXT_debug_utils` to receive its messages.
        Validation = vk::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation"),
        /// # `VK_LAYER_LUNARG_api_dump`
        /// Logs every Vulkan call and its parameters to standard output.
        ApiDump = vk::ExtensionName::from_bytes(b"VK_LAYER_LUNARG_api_dump"),
    }
}
