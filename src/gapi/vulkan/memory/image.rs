use crate::gapi::vulkan::core::logical_device::LogicalDevice;
use crate::gapi::vulkan::errors::NegotiationError;
use log::trace;
use vulkanalia::vk;
use vulkanalia::vk::HasBuilder;

/// A swapchain image together with the view the application reads and writes it through.
#[derive(Debug, Clone, Copy)]
pub struct SwapchainImage {
    /// Image owned by the presentation engine. Represents the actual heap of pixels in memory,
    /// without any information about how to interpret them.
    pub image: vk::Image,
    /// Owned by us and destroyed by the owning [`Swapchain`](super::swapchain::Swapchain).
    /// Describes how to access the image: format, component mapping, subresource range.
    pub view: vk::ImageView,
}

impl SwapchainImage {
    /// Creates a 2D color view over the single mip level and array layer of `image`.
    pub fn new(
        image: vk::Image,
        format: vk::Format,
        device: &LogicalDevice,
    ) -> Result<Self, NegotiationError> {
        // Identity swizzle: each channel reads itself.
        let components = vk::ComponentMapping::builder()
            .r(vk::ComponentSwizzle::IDENTITY)
            .g(vk::ComponentSwizzle::IDENTITY)
            .b(vk::ComponentSwizzle::IDENTITY)
            .a(vk::ComponentSwizzle::IDENTITY);

        // Our images will be used as color targets without any mipmapping levels or multiple layers.
        let subresource_range = vk::ImageSubresourceRange::builder()
            .aspect_mask(vk::ImageAspectFlags::COLOR)
            .base_mip_level(0)
            .level_count(1)
            .base_array_layer(0)
            .layer_count(1);

        let info = vk::ImageViewCreateInfo::builder()
            .image(image)
            .view_type(vk::ImageViewType::_2D)
            .format(format)
            .components(components)
            .subresource_range(subresource_range);

        let view = device.create_image_view(&info)?;
        trace!("Created image view {view:?} for image {image:?}");

        Ok(Self { image, view })
    }
}
