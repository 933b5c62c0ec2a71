use crate::gapi::vulkan::core::instance::Instance;
use crate::window::window::MyWindow;
use log::debug;
use vulkanalia::vk::{KhrSurfaceExtension, SurfaceKHR};
use vulkanalia::window as vk_window;
use vulkanalia::Instance as VkInstance;

/// Abstract type of surface to present rendered images to, backed by the winit window.
///
/// The surface needs to exist right after the instance is created, because presentation
/// support on it drives queue family resolution and the whole swapchain negotiation.
///
/// Although the `vk::SurfaceKHR` object and its usage is platform-agnostic, its creation isn't.
/// vulkanalia hides the platform differences for winit windows.
pub(crate) struct Surface {
    vk_surface: SurfaceKHR,
    instance: VkInstance,
}

impl Surface {
    pub fn new(instance: &Instance, window: &MyWindow) -> anyhow::Result<Self> {
        let vk_surface =
            unsafe { vk_window::create_surface(instance.get_vk(), window.get(), window.get())? };
        Ok(Self {
            vk_surface,
            instance: instance.get_vk().clone(),
        })
    }

    pub fn get(&self) -> SurfaceKHR {
        self.vk_surface
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        debug!("Destroying surface.");
        unsafe {
            self.instance.destroy_surface_khr(self.vk_surface, None);
        }
    }
}
