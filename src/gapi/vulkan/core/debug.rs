use crate::gapi::vulkan::core::instance::Instance;
use log::{debug, error, trace, warn};
use std::ffi::CStr;
use std::os::raw::c_void;
use vulkanalia::vk;
use vulkanalia::vk::{
    DebugUtilsMessengerCreateInfoEXT, DebugUtilsMessengerEXT, ExtDebugUtilsExtension, HasBuilder,
};
use vulkanalia::Instance as VkInstance;

/// Routes validation-layer messages into the logger for as long as it lives.
pub(crate) struct Debugger {
    /// The messenger is in charge of handling the debug callback and its lifetime.
    /// It is destroyed on drop, before the instance it was created from.
    messenger: DebugUtilsMessengerEXT,
    instance: VkInstance,
}

impl Debugger {
    pub fn new(instance: &Instance) -> anyhow::Result<Self> {
        let debug_info = Self::get_debug_info();
        debug!("Adding debug callback.");
        let messenger = unsafe {
            instance
                .get_vk()
                .create_debug_utils_messenger_ext(&debug_info, None)?
        };
        Ok(Self {
            messenger,
            instance: instance.get_vk().clone(),
        })
    }

    /// Messenger configuration shared by the long-lived messenger and the one chained into
    /// instance creation (which covers `vkCreateInstance` and `vkDestroyInstance` themselves).
    pub fn get_debug_info() -> DebugUtilsMessengerCreateInfoEXT {
        DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(vk::DebugUtilsMessageSeverityFlagsEXT::all())
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .user_callback(Some(Self::debug_callback))
            .build()
    }

    /// The debug callback handed to the (external) Vulkan loader, hence `extern "system"`.
    ///
    /// Severity is mapped onto log levels: `ERROR` to `error!`, `WARNING` to `warn!`, `INFO` to
    /// `debug!` and `VERBOSE` to `trace!`.
    ///
    /// Returning `vk::TRUE` would abort the triggering call with `VALIDATION_FAILED_EXT`, which
    /// is only meant for testing the layers themselves.
    extern "system" fn debug_callback(
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
        type_: vk::DebugUtilsMessageTypeFlagsEXT,
        data: *const vk::DebugUtilsMessengerCallbackDataEXT,
        _: *mut c_void,
    ) -> vk::Bool32 {
        let data = unsafe { *data };
        let message = unsafe { CStr::from_ptr(data.message) }.to_string_lossy();

        if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
            error!("({:?}) {}", type_, message);
        } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
            warn!("({:?}) {}", type_, message);
        } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::INFO {
            debug!("({:?}) {}", type_, message);
        } else {
            trace!("({:?}) {}", type_, message);
        }

        vk::FALSE
    }
}

impl Drop for Debugger {
    fn drop(&mut self) {
        debug!("Destroying messenger.");
        unsafe {
            self.instance
                .destroy_debug_utils_messenger_ext(self.messenger, None);
        }
    }
}
