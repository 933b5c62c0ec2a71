use crate::gapi::vulkan::core::capabilities::InstanceCapabilities;
use anyhow::{anyhow, Context};
use log::trace;
use std::collections::HashSet;
use vulkanalia::loader::{LibloadingLoader, LIBRARY};
use vulkanalia::vk::EntryV1_0;
use vulkanalia::{vk, Version};
use vulkanalia::{Entry as VkEntry, Instance as VkInstance, VkResult};

/// # Vulkan Entry
/// The entry point for Vulkan: the object that dynamically loads the Vulkan API.
///
/// # Details
/// At the point of creating the `Entry`, the ICDs (the Vulkan front-ends of the GPU drivers) have
/// not been loaded yet. What `Entry` does is find the loader in the system (i.e. `vulkan-1.dll`
/// and `libvulkan.so.1`) and fetch the global symbols needed to bootstrap an instance
/// (`vkCreateInstance`, `vkEnumerateInstance*Properties`).
pub(crate) struct Entry {
    entry: VkEntry,
}

impl Entry {
    /// Constructs a new [Vulkan Entry](Entry) object.
    ///
    /// # Errors
    /// - If the loader library is not found.
    /// - If the loader does not expose the global Vulkan symbols.
    pub fn new() -> anyhow::Result<Self> {
        // Finds the dynamic library (e.g. `.so` or `.dll`)
        let loader = unsafe {
            LibloadingLoader::new(LIBRARY)
                .with_context(|| format!("Failed to load Vulkan library: {}", LIBRARY))?
        };
        // Dynamically dispatches the Vulkan functions
        let entry = unsafe {
            VkEntry::new(loader).map_err(|b| anyhow!("Failed to load Vulkan entry: {}", b))?
        };
        Ok(Self { entry })
    }

    /// The (maximum) Vulkan version the
    /// [Loader](https://github.com/KhronosGroup/Vulkan-Loader) supports.
    ///
    /// > Note: the ICDs could support a different version.
    pub fn version(&self) -> anyhow::Result<Version> {
        Ok(self.entry.version()?)
    }

    /// Creates the raw Vulkan instance. Called by
    /// [`Instance::new`](crate::gapi::vulkan::core::instance::Instance::new), which owns the
    /// configuration of layers, extensions and flags.
    pub fn create_instance(&self, info: &vk::InstanceCreateInfo) -> VkResult<VkInstance> {
        unsafe { self.entry.create_instance(info, None) }
    }

    /// # Capability Prober
    /// Snapshot of every layer and instance extension the loader and the installed layer
    /// manifests report.
    ///
    /// This calls `vkEnumerateInstanceLayerProperties` and
    /// `vkEnumerateInstanceExtensionProperties` underneath; neither has side effects.
    pub fn capabilities(&self) -> VkResult<InstanceCapabilities> {
        Ok(InstanceCapabilities {
            layers: self.available_layers()?,
            extensions: self.available_extensions()?,
        })
    }

    pub fn available_layers(&self) -> VkResult<HashSet<String>> {
        let layers = unsafe { self.entry.enumerate_instance_layer_properties() }?
            .iter()
            .map(|l| l.layer_name.to_string())
            .collect::<HashSet<_>>();
        trace!("Available layers: {layers:?}");
        Ok(layers)
    }

    pub fn available_extensions(&self) -> VkResult<HashSet<String>> {
        let extensions = unsafe { self.entry.enumerate_instance_extension_properties(None) }?
            .iter()
            .map(|e| e.extension_name.to_string())
            .collect::<HashSet<_>>();
        trace!("Available instance extensions: {extensions:?}");
        Ok(extensions)
    }
}
