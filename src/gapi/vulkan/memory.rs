pub mod image;
pub mod swapchain;
