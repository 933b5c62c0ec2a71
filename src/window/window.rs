use vulkanalia::vk;
use vulkanalia::vk::ExtensionName;
use vulkanalia::window as vk_window;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

pub struct MyWindow {
    winit_window: Window,
}

impl MyWindow {
    pub fn new(event_loop: &EventLoop<()>) -> anyhow::Result<Self> {
        let window = WindowBuilder::new()
            .with_title("Kindle")
            .with_inner_size(LogicalSize::new(800, 600))
            .with_resizable(true)
            .build(event_loop)?;
        Ok(Self {
            winit_window: window,
        })
    }

    pub fn get(&self) -> &Window {
        &self.winit_window
    }

    /// Instance extensions the window system needs to present to this window's surface type.
    pub fn get_required_extensions(&self) -> &'static [&'static ExtensionName] {
        vk_window::get_required_instance_extensions(&self.winit_window)
    }

    /// Current framebuffer size in physical pixels.
    pub fn size(&self) -> vk::Extent2D {
        let size = self.winit_window.inner_size();
        vk::Extent2D {
            width: size.width,
            height: size.height,
        }
    }
}
