use crate::gapi::vulkan::config::VulkanConfig;
use crate::gapi::vulkan::core::capabilities::InstanceWishlist;
use crate::gapi::vulkan::core::debug::Debugger;
use crate::gapi::vulkan::core::entry::Entry;
use crate::gapi::vulkan::core::real_device::{PhysicalDeviceCandidate, RealDevice};
use crate::gapi::vulkan::enums::extensions::PORTABILITY_MACOS_VERSION;
use crate::gapi::vulkan::errors::NegotiationError;
use anyhow::{anyhow, Context};
use log::{debug, trace};
use vulkanalia::vk::{HasBuilder, InstanceV1_0};
use vulkanalia::{vk, Instance as VkInstance};

/// # Vulkan Instance
/// The connection between this program and the Vulkan driver; the first object created and the
/// last one destroyed.
///
/// # Details
/// - Allows global queries for physical devices (GPUs).
/// - Allows the creation of surfaces and debug messengers, which are instance extensions.
/// - Everything created from it must be destroyed before it; it is destroyed on drop.
///
/// > Note: Instance captures the driver state at creation time, so any changes to the driver,
/// > layers, or extensions at system level after instance creation will not be reflected in the
/// > instance.
pub(crate) struct Instance {
    instance: VkInstance,
}

impl Instance {
    /// # Instance Creation
    ///
    /// Builds the wishlist from `config` and the window's required extensions, checks it against
    /// what the [`Entry`] reports, and only then asks the driver for an instance.
    ///
    /// # Errors
    /// - [`NegotiationError::UnsupportedRuntimeFeature`] when a wishlisted layer or extension is
    ///   not available.
    /// - On macOS, when the loader is too old for portability enumeration.
    pub fn new(
        entry: &Entry,
        config: &VulkanConfig,
        window_extensions: &[&'static vk::ExtensionName],
    ) -> anyhow::Result<Self> {
        let entry_version = entry.version()?;
        let portability = cfg!(target_os = "macos");
        if portability && entry_version < PORTABILITY_MACOS_VERSION {
            return Err(anyhow!(
                "MacOS portability requires Vulkan {}",
                PORTABILITY_MACOS_VERSION
            ));
        }

        let wishlist = InstanceWishlist::new(config, window_extensions, portability);
        debug!("Instance wishlist: {:?}", wishlist);
        let capabilities = entry
            .capabilities()
            .with_context(|| "Failed to query instance capabilities.")?;
        capabilities.validate(&wishlist)?;

        let application_info = Self::make_application_info();
        let layers = wishlist.layer_ptrs();
        let extensions = wishlist.extension_ptrs();
        let flags = if portability {
            vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        } else {
            vk::InstanceCreateFlags::empty()
        };

        let mut debug_info = Debugger::get_debug_info();
        let mut info = vk::InstanceCreateInfo::builder()
            .application_info(&application_info)
            .enabled_layer_names(&layers)
            .enabled_extension_names(&extensions)
            .flags(flags);
        // Cover the creation and destruction of the instance itself.
        if config.validation {
            debug!("Enabling validation layer.");
            info = info.push_next(&mut debug_info);
        }

        debug!("Creating instance...");
        let instance = entry
            .create_instance(&info)
            .map_err(NegotiationError::from)?;
        Ok(Self { instance })
    }

    fn make_application_info() -> vk::ApplicationInfo {
        vk::ApplicationInfo::builder()
            .application_name(b"Kindle\0")
            .application_version(vk::make_version(1, 0, 0))
            .engine_name(b"No Engine\0")
            .engine_version(vk::make_version(1, 0, 0))
            .api_version(vk::make_version(1, 3, 0))
            .build()
    }

    /// Snapshots every physical device the instance can see, in enumeration order.
    pub fn enumerate_candidates(&self) -> Result<Vec<PhysicalDeviceCandidate>, NegotiationError> {
        let handles = unsafe { self.instance.enumerate_physical_devices()? };
        trace!("Enumerated {} physical device(s).", handles.len());
        handles
            .into_iter()
            .map(|handle| RealDevice::new(self, handle).candidate())
            .collect()
    }

    pub fn get_vk(&self) -> &VkInstance {
        &self.instance
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        debug!("Destroying instance.");
        unsafe {
            self.instance.destroy_instance(None);
        }
    }
}
