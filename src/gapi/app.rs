use crate::gapi::vulkan::config::VulkanConfig;
use crate::gapi::vulkan::core::debug::Debugger;
use crate::gapi::vulkan::core::entry::Entry;
use crate::gapi::vulkan::core::instance::Instance;
use crate::gapi::vulkan::core::logical_device::LogicalDevice;
use crate::gapi::vulkan::core::queues::{resolve_queue_families, Queues};
use crate::gapi::vulkan::core::real_device::{PhysicalDeviceCandidate, RealDevice};
use crate::gapi::vulkan::core::selector::{select_device, DeviceRequirements};
use crate::gapi::vulkan::core::surface::Surface;
use crate::gapi::vulkan::enums::extensions::{DeviceExtension, PORTABILITY_MACOS_VERSION};
use crate::gapi::vulkan::memory::swapchain::{PresentationConfig, Swapchain};
use crate::window::window::MyWindow;
use crate::{debug_success, info_success, warn_warning};
use anyhow::Context;
use log::{debug, info};
use vulkanalia::vk;

/// # Vulkan App
/// Owns everything negotiated with the device: instance, debug messenger, surface, logical
/// device with its queue, and the swapchain.
///
/// Fields are declared in reverse creation order, so dropping the app releases every handle in
/// strictly reverse order. The same holds for the locals of [`App::new`] when a step fails
/// halfway through.
pub struct App {
    swapchain: Swapchain,
    device: LogicalDevice,
    physical_device: PhysicalDeviceCandidate,
    surface: Surface,
    debugger: Option<Debugger>,
    instance: Instance,
    entry: Entry,
    /// Set while the window has no drawable area; the chain is rebuilt once it has one again.
    suspended: bool,
}

impl App {
    /// Runs the whole initialization sequence: probe, select, build the execution context,
    /// negotiate presentation. Any failure aborts it.
    pub fn new(window: &MyWindow, config: &VulkanConfig) -> anyhow::Result<Self> {
        info!("Creating Entry...");
        let entry = Entry::new()?;
        info_success!("Entry Created! Loader Version: {}", entry.version()?);

        info!("Creating Instance...");
        let instance = Instance::new(&entry, config, window.get_required_extensions())
            .with_context(|| "Failed to create instance.")?;
        info_success!("Instance Created!");

        let debugger = if config.validation {
            info!("Creating debug messenger...");
            let debugger = Debugger::new(&instance)?;
            info_success!("Debug messenger created!");
            Some(debugger)
        } else {
            None
        };

        info!("Creating Surface...");
        let surface = Surface::new(&instance, window)?;
        info_success!("Surface Created!");

        let mut requirements = DeviceRequirements::from(config);
        if cfg!(target_os = "macos") && entry.version()? >= PORTABILITY_MACOS_VERSION {
            requirements
                .extensions
                .push(DeviceExtension::KhrPortabilitySubset);
        }
        info!("Required device extensions: {:?}", requirements.extensions);

        info!("Selecting physical device...");
        let candidates = instance
            .enumerate_candidates()
            .with_context(|| "Failed to enumerate physical devices.")?;
        let physical_device = select_device(candidates, &requirements)?;
        info_success!("Physical device selected: {}", physical_device.name);
        if physical_device.device_type != vk::PhysicalDeviceType::DISCRETE_GPU {
            warn_warning!("The selected physical device is not discrete.");
        }

        let real_device = RealDevice::new(&instance, physical_device.handle);
        let family = resolve_queue_families(&physical_device.queue_families, |index| {
            real_device.supports_surface(index, &surface)
        })?;
        debug_success!("Queue family resolved: {:?}", family);

        info!("Creating logical device...");
        let device = LogicalDevice::new(&real_device, &instance, family, &requirements.extensions)
            .with_context(|| "Failed to create logical device.")?;
        info_success!("Logical device created!");

        info!("Creating swapchain...");
        let swapchain = Self::build_swapchain(&real_device, &device, &surface, window, None)
            .with_context(|| "Failed to create swapchain.")?;
        info_success!("Swapchain created!");

        Ok(Self {
            swapchain,
            device,
            physical_device,
            surface,
            debugger,
            instance,
            entry,
            suspended: false,
        })
    }

    /// Re-queries the surface, renegotiates and rebuilds the swapchain with all its views.
    ///
    /// Called whenever the window is resized. While the window has no drawable area (minimized)
    /// the rebuild is deferred and the current chain is kept.
    pub fn resize(&mut self, window: &MyWindow) -> anyhow::Result<()> {
        let size = window.size();
        if size.width == 0 || size.height == 0 {
            debug!("Window has no drawable area, deferring swapchain rebuild.");
            self.suspended = true;
            return Ok(());
        }
        self.suspended = false;

        info!("Recreating swapchain...");
        self.device.wait_idle()?;
        let real_device = RealDevice::new(&self.instance, self.physical_device.handle);
        let swapchain = Self::build_swapchain(
            &real_device,
            &self.device,
            &self.surface,
            window,
            Some(&self.swapchain),
        )
        .with_context(|| "Failed to recreate swapchain.")?;
        // The old chain (views first) is released here.
        self.swapchain = swapchain;
        info_success!("Swapchain recreated!");
        Ok(())
    }

    fn build_swapchain(
        real_device: &RealDevice,
        device: &LogicalDevice,
        surface: &Surface,
        window: &MyWindow,
        previous: Option<&Swapchain>,
    ) -> anyhow::Result<Swapchain> {
        let capabilities = real_device
            .surface_capabilities(surface)
            .with_context(|| "Failed to query surface capabilities.")?;
        let config = PresentationConfig::negotiate(&capabilities, window.size())?;
        Ok(Swapchain::new(device, surface, config, previous)?)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// The raw instance, for collaborators creating further surfaces or running more queries.
    pub fn instance(&self) -> &vulkanalia::Instance {
        self.instance.get_vk()
    }

    pub fn physical_device(&self) -> &PhysicalDeviceCandidate {
        &self.physical_device
    }

    pub fn device(&self) -> &vulkanalia::Device {
        self.device.get_vk()
    }

    pub fn queues(&self) -> &Queues {
        self.device.get_queues()
    }

    pub fn swapchain(&self) -> &Swapchain {
        &self.swapchain
    }
}

impl Drop for App {
    fn drop(&mut self) {
        info!("Destroying Vulkan App...");
        // Nothing may still be in flight on the queue when the handles start going away.
        if let Err(error) = self.device.wait_idle() {
            log::error!("Failed to wait for the device to idle: {error}");
        }
    }
}
