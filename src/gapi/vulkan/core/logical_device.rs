use crate::gapi::vulkan::core::instance::Instance;
use crate::gapi::vulkan::core::queues::{QueueFamilySelection, Queues};
use crate::gapi::vulkan::core::real_device::RealDevice;
use crate::gapi::vulkan::enums::extensions::DeviceExtension;
use crate::gapi::vulkan::errors::NegotiationError;
use log::{debug, trace};
use vulkanalia::vk::{
    DeviceV1_0, HasBuilder, ImageViewCreateInfo, InstanceV1_0, KhrSwapchainExtension,
    SwapchainCreateInfoKHR, SwapchainKHR,
};
use vulkanalia::{vk, Device};

/// Queue priority of the single queue we create. Lowest level; there is nothing to compete with.
pub(crate) const QUEUE_PRIORITY: f32 = 0.0;

/// Wraps the Vulkan logical device, and the queue handles it owns.
///
/// This object is responsible for:
/// - Creating the Vulkan device from the selected physical device.
/// - Fetching the graphics/present queue handle.
/// - Destroying the device (and by extension, the queues) when dropped.
pub struct LogicalDevice {
    /// The Vulkan device handle.
    device: Device,
    queues: Queues,
}

impl LogicalDevice {
    /// # Execution Context Builder
    /// Creates the logical device with exactly one queue from `family`, the requested device
    /// extensions, and exactly two optional features enabled: dynamic rendering and extended
    /// dynamic state.
    pub(crate) fn new(
        real_device: &RealDevice,
        instance: &Instance,
        family: QueueFamilySelection,
        extensions: &[DeviceExtension],
    ) -> Result<Self, NegotiationError> {
        let queue_priorities = &[QUEUE_PRIORITY];
        let queue_infos = &[vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(family.graphics())
            .queue_priorities(queue_priorities)];

        let ext_names = extensions.iter().map(|e| e.name_ptr()).collect::<Vec<_>>();
        debug!("Enabling device extensions: {:?}", extensions);

        let mut vulkan13 = vk::PhysicalDeviceVulkan13Features::builder().dynamic_rendering(true);
        let mut extended_dynamic_state =
            vk::PhysicalDeviceExtendedDynamicStateFeaturesEXT::builder().extended_dynamic_state(true);

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(queue_infos)
            .enabled_extension_names(&ext_names)
            .push_next(&mut vulkan13)
            .push_next(&mut extended_dynamic_state);

        let device = unsafe {
            instance
                .get_vk()
                .create_device(*real_device.get_vk(), &create_info, None)?
        };
        let queues = Queues::new(&device, family);
        debug!("Queues: {:?}", queues);

        Ok(Self { device, queues })
    }

    pub fn create_swapchain_khr(
        &self,
        info: &SwapchainCreateInfoKHR,
    ) -> Result<SwapchainKHR, NegotiationError> {
        trace!("Calling create_swapchain_khr with info: {:?}", info);
        Ok(unsafe { self.device.create_swapchain_khr(info, None)? })
    }

    pub fn get_swapchain_images_khr(
        &self,
        swapchain: SwapchainKHR,
    ) -> Result<Vec<vk::Image>, NegotiationError> {
        trace!(
            "Calling get_swapchain_images_khr for swapchain: {:?}",
            swapchain
        );
        Ok(unsafe { self.device.get_swapchain_images_khr(swapchain)? })
    }

    pub fn create_image_view(
        &self,
        create_info: &ImageViewCreateInfo,
    ) -> Result<vk::ImageView, NegotiationError> {
        trace!("Calling create_image_view with info: {:?}", create_info);
        Ok(unsafe { self.device.create_image_view(create_info, None)? })
    }

    /// Blocks until every queue of the device is idle. Needed before tearing down anything the
    /// presentation engine may still reference.
    pub fn wait_idle(&self) -> Result<(), NegotiationError> {
        trace!("Calling device_wait_idle");
        Ok(unsafe { self.device.device_wait_idle()? })
    }

    /// Returns a reference to the underlying Vulkan [`Device`].
    pub fn get_vk(&self) -> &Device {
        &self.device
    }

    pub fn get_queues(&self) -> &Queues {
        &self.queues
    }
}

impl Drop for LogicalDevice {
    /// Destroying the device frees all queues it owns.
    fn drop(&mut self) {
        debug!("Destroying logical device.");
        unsafe {
            self.device.destroy_device(None);
        }
    }
}
