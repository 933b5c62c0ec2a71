use crate::gapi::vulkan::core::logical_device::LogicalDevice;
use crate::gapi::vulkan::core::real_device::SurfaceCapabilities;
use crate::gapi::vulkan::core::surface::Surface;
use crate::gapi::vulkan::errors::NegotiationError;
use crate::gapi::vulkan::memory::image::SwapchainImage;
use log::{debug, trace};
use vulkanalia::vk::{DeviceV1_0, Handle, HasBuilder, KhrSwapchainExtension};
use vulkanalia::{vk, Device};

/// Image count asked for when the surface allows it: one more than double buffering, so we
/// rarely wait on the presentation engine to release an image.
pub const PREFERRED_IMAGE_COUNT: u32 = 3;

/// The negotiated swapchain parameters.
#[derive(Clone, Copy, Debug)]
pub struct PresentationConfig {
    /// Pixel format and color space of the swapchain images.
    pub format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
    /// Minimum number of images requested; the driver may create more.
    pub image_count: u32,
    /// The surface's current transform, applied as-is.
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
}

impl PresentationConfig {
    /// # Presentation Negotiator
    /// Resolves format, present mode, extent and image count from what the surface reports.
    ///
    /// # Parameters
    /// - `surface`: a fresh capability snapshot of the surface on the selected device.
    /// - `drawable`: the window's current framebuffer size in pixels; only consulted when the
    ///   surface leaves the extent up to us.
    ///
    /// # Errors
    /// [`NegotiationError::SurfaceNegotiationFailure`] when the surface reports no formats or no
    /// present modes.
    pub fn negotiate(
        surface: &SurfaceCapabilities,
        drawable: vk::Extent2D,
    ) -> Result<Self, NegotiationError> {
        let format = choose_surface_format(&surface.formats).ok_or(
            NegotiationError::SurfaceNegotiationFailure("the surface reports no formats"),
        )?;
        if surface.present_modes.is_empty() {
            return Err(NegotiationError::SurfaceNegotiationFailure(
                "the surface reports no present modes",
            ));
        }
        let config = Self {
            format,
            present_mode: choose_present_mode(&surface.present_modes),
            extent: choose_extent(&surface.limits, drawable),
            image_count: choose_image_count(&surface.limits),
            pre_transform: surface.limits.current_transform,
        };
        debug!("Negotiated presentation: {:?}", config);
        Ok(config)
    }
}

/// 8-bit BGRA in the sRGB non-linear color space if offered, wherever it sits in the list;
/// otherwise the first pair the surface reports.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_SRGB
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .or_else(|| formats.first())
        .copied()
}

/// Mailbox (low latency, no tearing) if offered, otherwise FIFO, which every surface supports.
pub fn choose_present_mode(present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    if present_modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    }
}

/// A current extent of `u32::MAX` means the surface lets the swapchain decide its size: use the
/// drawable size clamped per axis to the supported range. Any other current extent is used
/// verbatim.
pub fn choose_extent(limits: &vk::SurfaceCapabilitiesKHR, drawable: vk::Extent2D) -> vk::Extent2D {
    if limits.current_extent.width != u32::MAX {
        return limits.current_extent;
    }
    vk::Extent2D {
        width: drawable
            .width
            .clamp(limits.min_image_extent.width, limits.max_image_extent.width),
        height: drawable
            .height
            .clamp(limits.min_image_extent.height, limits.max_image_extent.height),
    }
}

/// At least [`PREFERRED_IMAGE_COUNT`], never below the surface minimum, never above the surface
/// maximum unless that maximum is 0 (no upper bound).
pub fn choose_image_count(limits: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = PREFERRED_IMAGE_COUNT.max(limits.min_image_count);
    if limits.max_image_count != 0 {
        count.min(limits.max_image_count)
    } else {
        count
    }
}

/// The chain of presentable images plus one view per image.
///
/// Rebuilt wholesale on any invalidation: there is no per-image replacement. Dropping it destroys
/// the views first and the swapchain after.
pub struct Swapchain {
    vk_swapchain: vk::SwapchainKHR,
    /// Images (owned by the presentation engine) and their views (owned by us), in the order the
    /// driver returns them; acquire/present refer to them by that index.
    images: Vec<SwapchainImage>,
    config: PresentationConfig,
    device: Device,
}

impl Swapchain {
    /// Builds the chain for a negotiated `config`.
    ///
    /// Exclusive sharing is always used: the device has a single queue family for graphics and
    /// presentation. `previous`, when rebuilding, lets the driver hand resources over from the
    /// chain being replaced; it stays valid and must be dropped by the caller afterwards.
    pub(crate) fn new(
        logical_device: &LogicalDevice,
        surface: &Surface,
        config: PresentationConfig,
        previous: Option<&Swapchain>,
    ) -> Result<Self, NegotiationError> {
        let family = logical_device.get_queues().family;
        debug_assert_eq!(family.graphics(), family.present());

        let old_swapchain = previous.map_or(vk::SwapchainKHR::null(), |s| s.vk_swapchain);

        debug!(
            "Creating swapchain with the following configuration:\
            \n- min_image_count: {}\
            \n- image_format: {:?}\
            \n- image_color_space: {:?}\
            \n- image_extent: {:?}\
            \n- pre_transform: {:?}\
            \n- present_mode: {:?}\
            \n- old_swapchain: {:?}",
            config.image_count,
            config.format.format,
            config.format.color_space,
            config.extent,
            config.pre_transform,
            config.present_mode,
            old_swapchain
        );

        let info = vk::SwapchainCreateInfoKHR::builder()
            .surface(surface.get())
            .min_image_count(config.image_count)
            .image_format(config.format.format)
            .image_color_space(config.format.color_space)
            .image_extent(config.extent)
            .image_array_layers(1)
            // We render directly into the swapchain images.
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .pre_transform(config.pre_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(config.present_mode)
            // Pixels hidden behind other windows may be skipped by the presentation engine.
            .clipped(true)
            .old_swapchain(old_swapchain);

        let vk_swapchain = logical_device.create_swapchain_khr(&info)?;

        // From here on, drop cleans up whatever was created if a later step fails.
        let mut swapchain = Self {
            vk_swapchain,
            images: Vec::new(),
            config,
            device: logical_device.get_vk().clone(),
        };
        for image in logical_device.get_swapchain_images_khr(vk_swapchain)? {
            let image = SwapchainImage::new(image, config.format.format, logical_device)?;
            swapchain.images.push(image);
        }
        debug!("Swapchain holds {} image(s).", swapchain.images.len());

        Ok(swapchain)
    }

    pub fn get_vk(&self) -> vk::SwapchainKHR {
        self.vk_swapchain
    }

    pub fn images(&self) -> &[SwapchainImage] {
        &self.images
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        for image in &self.images {
            trace!("Destroying image view {:?}", image.view);
            unsafe { self.device.destroy_image_view(image.view, None) };
        }
        trace!("Destroying swapchain {:?}", self.vk_swapchain);
        unsafe { self.device.destroy_swapchain_khr(self.vk_swapchain, None) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    fn limits(min: u32, max: u32) -> vk::SurfaceCapabilitiesKHR {
        vk::SurfaceCapabilitiesKHR {
            min_image_count: min,
            max_image_count: max,
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            min_image_extent: vk::Extent2D {
                width: 16,
                height: 16,
            },
            max_image_extent: vk::Extent2D {
                width: 4096,
                height: 2048,
            },
            current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
            ..Default::default()
        }
    }

    fn extent(width: u32, height: u32) -> vk::Extent2D {
        vk::Extent2D { width, height }
    }

    #[test]
    fn undefined_extent_clamps_drawable_size_per_axis() {
        let limits = limits(2, 0);
        let cases = [
            ((800, 600), (800, 600)),
            ((8, 600), (16, 600)),
            ((5000, 3000), (4096, 2048)),
            ((1, 9000), (16, 2048)),
        ];
        for ((w, h), (ew, eh)) in cases {
            let resolved = choose_extent(&limits, extent(w, h));
            assert_eq!((resolved.width, resolved.height), (ew, eh), "drawable {w}x{h}");
        }
    }

    #[test]
    fn defined_extent_is_authoritative() {
        let mut limits = limits(2, 0);
        limits.current_extent = extent(1280, 720);
        for drawable in [extent(1, 1), extent(1280, 720), extent(9999, 9999)] {
            let resolved = choose_extent(&limits, drawable);
            assert_eq!((resolved.width, resolved.height), (1280, 720));
        }
    }

    #[test]
    fn image_count_resolution() {
        assert_eq!(choose_image_count(&limits(2, 0)), 3);
        assert_eq!(choose_image_count(&limits(2, 3)), 3);
        assert_eq!(choose_image_count(&limits(4, 0)), 4);
        assert_eq!(choose_image_count(&limits(1, 2)), 2);
        assert_eq!(choose_image_count(&limits(3, 8)), 3);
    }

    #[test]
    fn bgra_srgb_wins_regardless_of_position() {
        let preferred = format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR);
        let others = [
            format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::DISPLAY_P3_NONLINEAR_EXT),
        ];
        for position in 0..=others.len() {
            let mut formats = others.to_vec();
            formats.insert(position, preferred);
            let chosen = choose_surface_format(&formats).unwrap();
            assert_eq!(chosen.format, vk::Format::B8G8R8A8_SRGB);
            assert_eq!(chosen.color_space, vk::ColorSpaceKHR::SRGB_NONLINEAR);
        }
    }

    #[test]
    fn format_falls_back_to_first_reported() {
        let formats = [
            format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        let first = choose_surface_format(&formats).unwrap();
        let second = choose_surface_format(&formats).unwrap();
        assert_eq!(first.format, vk::Format::R8G8B8A8_UNORM);
        assert_eq!(first.format, second.format);
        assert!(choose_surface_format(&[]).is_none());
    }

    #[test]
    fn mailbox_preferred_then_fifo() {
        assert_eq!(
            choose_present_mode(&[vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX]),
            vk::PresentModeKHR::MAILBOX
        );
        assert_eq!(
            choose_present_mode(&[
                vk::PresentModeKHR::IMMEDIATE,
                vk::PresentModeKHR::FIFO_RELAXED,
                vk::PresentModeKHR::FIFO
            ]),
            vk::PresentModeKHR::FIFO
        );
    }

    #[test]
    fn negotiate_combines_every_choice() {
        let surface = SurfaceCapabilities {
            limits: limits(2, 0),
            formats: vec![format(
                vk::Format::B8G8R8A8_SRGB,
                vk::ColorSpaceKHR::SRGB_NONLINEAR,
            )],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        };
        let config = PresentationConfig::negotiate(&surface, extent(800, 600)).unwrap();
        assert_eq!(config.format.format, vk::Format::B8G8R8A8_SRGB);
        assert_eq!(config.present_mode, vk::PresentModeKHR::FIFO);
        assert_eq!((config.extent.width, config.extent.height), (800, 600));
        assert_eq!(config.image_count, 3);
        assert_eq!(config.pre_transform, vk::SurfaceTransformFlagsKHR::IDENTITY);
    }

    #[test]
    fn degenerate_surfaces_fail_negotiation() {
        let no_formats = SurfaceCapabilities {
            limits: limits(2, 0),
            formats: Vec::new(),
            present_modes: vec![vk::PresentModeKHR::FIFO],
        };
        assert!(matches!(
            PresentationConfig::negotiate(&no_formats, extent(800, 600)),
            Err(NegotiationError::SurfaceNegotiationFailure(_))
        ));

        let no_modes = SurfaceCapabilities {
            formats: vec![format(
                vk::Format::B8G8R8A8_SRGB,
                vk::ColorSpaceKHR::SRGB_NONLINEAR,
            )],
            present_modes: Vec::new(),
            ..no_formats
        };
        assert!(matches!(
            PresentationConfig::negotiate(&no_modes, extent(800, 600)),
            Err(NegotiationError::SurfaceNegotiationFailure(_))
        ));
    }
}
