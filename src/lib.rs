//! Vulkan device selection and swapchain negotiation.
//!
//! [`gapi::app::App`] probes the runtime, picks a physical device, opens a logical device with a
//! single graphics/present queue and builds a swapchain for a [`window::window::MyWindow`].

pub mod gapi;
pub mod log;
pub mod window;
