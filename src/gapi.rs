pub mod app;
pub mod vulkan;
