use crate::gapi::vulkan::core::instance::Instance;
use crate::gapi::vulkan::core::surface::Surface;
use crate::gapi::vulkan::errors::NegotiationError;
use std::collections::HashSet;
use vulkanalia::vk;
use vulkanalia::vk::{
    HasBuilder, InstanceV1_0, InstanceV1_1, KhrSurfaceExtension,
    PhysicalDevice as VkPhysicalDevice, PresentModeKHR, QueueFamilyProperties,
    SurfaceCapabilitiesKHR, SurfaceFormatKHR,
};
use vulkanalia::VkResult;

/// The optional device features the application cannot run without.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceFeatures {
    pub dynamic_rendering: bool,
    pub extended_dynamic_state: bool,
}

/// Read-only snapshot of one enumerable physical device, taken once right after enumeration.
///
/// Selection policy runs over these plain values only, so it never touches the driver.
#[derive(Clone, Debug)]
pub struct PhysicalDeviceCandidate {
    pub handle: VkPhysicalDevice,
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    /// Packed API version, as reported in `VkPhysicalDeviceProperties::apiVersion`.
    pub api_version: u32,
    pub queue_families: Vec<QueueFamilyProperties>,
    pub extensions: HashSet<String>,
    pub features: DeviceFeatures,
}

/// What a surface supports on a given physical device.
///
/// May change across window resizes, so it is re-queried every time the swapchain is rebuilt.
#[derive(Clone, Debug)]
pub struct SurfaceCapabilities {
    /// Image count and extent limits, current extent and transform, composite alpha modes.
    pub limits: SurfaceCapabilitiesKHR,
    /// Supported format and color space pairs, in reported order.
    pub formats: Vec<SurfaceFormatKHR>,
    pub present_modes: Vec<PresentModeKHR>,
}

/// Whether `VkPhysicalDeviceVulkan13Features` may be chained into a features query for a device
/// reporting `api_version`.
pub fn supports_vulkan13_features(api_version: u32) -> bool {
    api_version >= vk::make_version(1, 3, 0)
}

/// A physical device seen through the instance that enumerated it.
pub struct RealDevice<'a> {
    vk_real_device: VkPhysicalDevice,
    instance: &'a Instance,
}

impl<'a> RealDevice<'a> {
    pub(crate) fn new(instance: &'a Instance, vk_real_device: VkPhysicalDevice) -> Self {
        Self {
            vk_real_device,
            instance,
        }
    }

    pub fn get_vk(&self) -> &VkPhysicalDevice {
        &self.vk_real_device
    }

    /// Takes the snapshot the device selector works on.
    pub fn candidate(&self) -> Result<PhysicalDeviceCandidate, NegotiationError> {
        let properties = self.get_properties();
        Ok(PhysicalDeviceCandidate {
            handle: self.vk_real_device,
            name: properties.device_name.to_string(),
            device_type: properties.device_type,
            api_version: properties.api_version,
            queue_families: self.get_queue_families_properties(),
            extensions: self.supported_extensions()?,
            features: self.get_features(properties.api_version),
        })
    }

    pub fn get_properties(&self) -> vk::PhysicalDeviceProperties {
        unsafe {
            self.instance
                .get_vk()
                .get_physical_device_properties(self.vk_real_device)
        }
    }

    /// Queries dynamic rendering (Vulkan 1.3 core) and extended dynamic state (EXT) support
    /// through the `VkPhysicalDeviceFeatures2` chain.
    ///
    /// Devices older than 1.3 report nothing: the 1.3 feature struct may not be chained for them.
    pub fn get_features(&self, api_version: u32) -> DeviceFeatures {
        if !supports_vulkan13_features(api_version) {
            return DeviceFeatures::default();
        }
        let mut vulkan13 = vk::PhysicalDeviceVulkan13Features::default();
        let mut extended_dynamic_state = vk::PhysicalDeviceExtendedDynamicStateFeaturesEXT::default();
        {
            let mut features = vk::PhysicalDeviceFeatures2::builder()
                .push_next(&mut vulkan13)
                .push_next(&mut extended_dynamic_state);
            unsafe {
                self.instance
                    .get_vk()
                    .get_physical_device_features2(self.vk_real_device, &mut features);
            }
        }
        DeviceFeatures {
            dynamic_rendering: vulkan13.dynamic_rendering == vk::TRUE,
            extended_dynamic_state: extended_dynamic_state.extended_dynamic_state == vk::TRUE,
        }
    }

    pub fn get_queue_families_properties(&self) -> Vec<QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_vk()
                .get_physical_device_queue_family_properties(self.vk_real_device)
        }
    }

    pub fn supported_extensions(&self) -> VkResult<HashSet<String>> {
        let extensions = unsafe {
            self.instance
                .get_vk()
                .enumerate_device_extension_properties(self.vk_real_device, None)?
        };
        Ok(extensions
            .iter()
            .map(|e| e.extension_name.to_string())
            .collect())
    }

    pub(crate) fn supports_surface(&self, family_index: u32, surface: &Surface) -> VkResult<bool> {
        unsafe {
            self.instance
                .get_vk()
                .get_physical_device_surface_support_khr(
                    self.vk_real_device,
                    family_index,
                    surface.get(),
                )
        }
    }

    /// Capabilities, formats and present modes of `surface` on this device, in one snapshot.
    pub(crate) fn surface_capabilities(&self, surface: &Surface) -> VkResult<SurfaceCapabilities> {
        let instance = self.instance.get_vk();
        unsafe {
            Ok(SurfaceCapabilities {
                limits: instance
                    .get_physical_device_surface_capabilities_khr(self.vk_real_device, surface.get())?,
                formats: instance
                    .get_physical_device_surface_formats_khr(self.vk_real_device, surface.get())?,
                present_modes: instance.get_physical_device_surface_present_modes_khr(
                    self.vk_real_device,
                    surface.get(),
                )?,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vulkan13_features_need_a_1_3_device() {
        assert!(!supports_vulkan13_features(vk::make_version(1, 2, 198)));
        assert!(supports_vulkan13_features(vk::make_version(1, 3, 0)));
        assert!(supports_vulkan13_features(vk::make_version(1, 4, 304)));
    }
}
