use crate::gapi::vulkan::config::VulkanConfig;
use crate::gapi::vulkan::enums::extensions::InstanceExtension;
use crate::gapi::vulkan::enums::layers::InstanceLayer;
use crate::gapi::vulkan::errors::{NegotiationError, RuntimeFeature};
use log::trace;
use std::collections::HashSet;
use std::ffi::c_char;
use vulkanalia::vk;

/// Snapshot of the layers and instance extensions the runtime reports as available.
///
/// Queried once at startup through [`Entry::capabilities`](super::entry::Entry::capabilities)
/// and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct InstanceCapabilities {
    pub layers: HashSet<String>,
    pub extensions: HashSet<String>,
}

/// The layers and instance extensions the application is about to enable.
#[derive(Debug, Clone, Default)]
pub struct InstanceWishlist {
    pub layers: Vec<&'static vk::ExtensionName>,
    pub extensions: Vec<&'static vk::ExtensionName>,
}

impl InstanceWishlist {
    /// Collects everything the instance will be created with.
    ///
    /// # Parameters
    /// - `config`: decides whether the diagnostics entries are wished for.
    /// - `window_extensions`: what the window system needs to present to its surface type.
    /// - `portability`: adds the extensions needed to enumerate portability (MoltenVK) devices.
    pub fn new(
        config: &VulkanConfig,
        window_extensions: &[&'static vk::ExtensionName],
        portability: bool,
    ) -> Self {
        let mut layers = Vec::new();
        if config.validation {
            layers.push(InstanceLayer::Validation.name_buf());
        }
        if config.api_dump {
            layers.push(InstanceLayer::ApiDump.name_buf());
        }

        let mut extensions = window_extensions.to_vec();
        if config.validation {
            extensions.push(InstanceExtension::ExtDebugUtils.name_buf());
        }
        if portability {
            extensions.push(InstanceExtension::KhrGetPhysicalDeviceProperties2.name_buf());
            extensions.push(InstanceExtension::KhrPortabilityEnumeration.name_buf());
        }

        Self { layers, extensions }
    }

    pub fn layer_ptrs(&self) -> Vec<*const c_char> {
        self.layers.iter().map(|name| name.as_ptr()).collect()
    }

    pub fn extension_ptrs(&self) -> Vec<*const c_char> {
        self.extensions.iter().map(|name| name.as_ptr()).collect()
    }
}

impl InstanceCapabilities {
    /// Checks that every wishlisted layer and extension is available, by exact name.
    ///
    /// # Errors
    /// [`NegotiationError::UnsupportedRuntimeFeature`] naming the first entry that is missing.
    /// Nothing is silently dropped: an unsupported layer would only fail later, and less clearly,
    /// at instance creation.
    pub fn validate(&self, wishlist: &InstanceWishlist) -> Result<(), NegotiationError> {
        Self::require(&self.layers, &wishlist.layers, RuntimeFeature::Layer)?;
        Self::require(&self.extensions, &wishlist.extensions, RuntimeFeature::Extension)
    }

    fn require(
        available: &HashSet<String>,
        wanted: &[&'static vk::ExtensionName],
        kind: RuntimeFeature,
    ) -> Result<(), NegotiationError> {
        for name in wanted.iter().map(|name| name.to_string()) {
            trace!("Checking {kind} `{name}`...");
            if !available.contains(&name) {
                return Err(NegotiationError::UnsupportedRuntimeFeature { kind, name });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: vk::ExtensionName = vk::ExtensionName::from_bytes(b"VK_KHR_surface");
    const XCB: vk::ExtensionName = vk::ExtensionName::from_bytes(b"VK_KHR_xcb_surface");

    fn config(validation: bool) -> VulkanConfig {
        VulkanConfig {
            validation,
            ..VulkanConfig::default()
        }
    }

    fn capabilities(layers: &[&str], extensions: &[&str]) -> InstanceCapabilities {
        InstanceCapabilities {
            layers: layers.iter().map(|s| s.to_string()).collect(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn diagnostics_off_wishes_only_window_extensions() {
        let wishlist = InstanceWishlist::new(&config(false), &[&SURFACE, &XCB], false);
        assert!(wishlist.layers.is_empty());
        let names: Vec<String> = wishlist.extensions.iter().map(|e| e.to_string()).collect();
        assert_eq!(names, ["VK_KHR_surface", "VK_KHR_xcb_surface"]);
    }

    #[test]
    fn diagnostics_on_wishes_validation_and_debug_utils() {
        let wishlist = InstanceWishlist::new(&config(true), &[&SURFACE], false);
        assert_eq!(wishlist.layers.len(), 1);
        assert_eq!(wishlist.layers[0].to_string(), "VK_LAYER_KHRONOS_validation");
        assert!(
            wishlist
                .extensions
                .iter()
                .any(|e| e.to_string() == "VK_EXT_debug_utils")
        );
    }

    #[test]
    fn portability_adds_enumeration_extensions() {
        let wishlist = InstanceWishlist::new(&config(false), &[&SURFACE], true);
        let names: Vec<String> = wishlist.extensions.iter().map(|e| e.to_string()).collect();
        assert!(names.contains(&"VK_KHR_portability_enumeration".to_string()));
        assert!(names.contains(&"VK_KHR_get_physical_device_properties2".to_string()));
        assert_eq!(wishlist.extension_ptrs().len(), names.len());
    }

    #[test]
    fn complete_capabilities_pass() {
        let wishlist = InstanceWishlist::new(&config(true), &[&SURFACE], false);
        let available = capabilities(
            &["VK_LAYER_KHRONOS_validation"],
            &["VK_KHR_surface", "VK_EXT_debug_utils"],
        );
        assert!(available.validate(&wishlist).is_ok());
    }

    #[test]
    fn missing_layer_is_named() {
        let wishlist = InstanceWishlist::new(&config(true), &[&SURFACE], false);
        let available = capabilities(&[], &["VK_KHR_surface", "VK_EXT_debug_utils"]);
        match available.validate(&wishlist) {
            Err(NegotiationError::UnsupportedRuntimeFeature { kind, name }) => {
                assert_eq!(kind, RuntimeFeature::Layer);
                assert_eq!(name, "VK_LAYER_KHRONOS_validation");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_extension_is_named_and_match_is_case_sensitive() {
        let wishlist = InstanceWishlist::new(&config(false), &[&SURFACE, &XCB], false);
        let available = capabilities(&[], &["VK_KHR_surface", "vk_khr_xcb_surface"]);
        match available.validate(&wishlist) {
            Err(NegotiationError::UnsupportedRuntimeFeature { kind, name }) => {
                assert_eq!(kind, RuntimeFeature::Extension);
                assert_eq!(name, "VK_KHR_xcb_surface");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
