use crate::gapi::vulkan::errors::{NegotiationError, QueueFamilyShortfall};
use log::{debug, trace};
use vulkanalia::vk::{DeviceV1_0, Queue, QueueFamilyProperties};
use vulkanalia::{vk, Device, VkResult};

/// Indices of the queue families used for graphics submission and for presentation.
///
/// Only [`resolve_queue_families`] builds one, and it refuses to unless both roles land on the
/// same family. That single family is what lets the swapchain use exclusive sharing without any
/// ownership transfer between queues.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QueueFamilySelection {
    graphics: u32,
    present: u32,
}

impl QueueFamilySelection {
    pub fn graphics(&self) -> u32 {
        self.graphics
    }

    pub fn present(&self) -> u32 {
        self.present
    }
}

/// Scans queue families in index order for one that supports graphics operations and can
/// present to the surface.
///
/// The first graphics family and the first presenting family are remembered along the way, but
/// the scan keeps going until a single family does both, and stops right there.
///
/// # Parameters
/// - `families`: the queue family properties of the physical device, in index order.
/// - `supports_present`: asks the runtime whether the family at an index can present.
///
/// # Errors
/// [`NegotiationError::QueueFamilyUnavailable`] when a role cannot be served at all, or when
/// the two roles only resolve to different families.
pub fn resolve_queue_families<F>(
    families: &[QueueFamilyProperties],
    mut supports_present: F,
) -> Result<QueueFamilySelection, NegotiationError>
where
    F: FnMut(u32) -> VkResult<bool>,
{
    let mut graphics = None;
    let mut present = None;

    for (index, family) in families.iter().enumerate() {
        let index = index as u32;
        let can_draw = family.queue_flags.contains(vk::QueueFlags::GRAPHICS);
        let can_present = supports_present(index)?;
        trace!("Queue family {index}: graphics={can_draw}, present={can_present}");

        if can_draw && can_present {
            debug!("Queue family {index} supports both graphics and presentation.");
            return Ok(QueueFamilySelection {
                graphics: index,
                present: index,
            });
        }
        if can_draw && graphics.is_none() {
            graphics = Some(index);
        }
        if can_present && present.is_none() {
            present = Some(index);
        }
    }

    let shortfall = match (graphics, present) {
        (None, _) => QueueFamilyShortfall::NoGraphics,
        (_, None) => QueueFamilyShortfall::NoPresent,
        (Some(graphics), Some(present)) => QueueFamilyShortfall::Split { graphics, present },
    };
    Err(NegotiationError::QueueFamilyUnavailable(shortfall))
}

/// The queue handles the logical device hands out.
///
/// Both roles share one family, so both fields hold the same queue handle.
#[derive(Debug, Clone, Copy)]
pub struct Queues {
    pub family: QueueFamilySelection,
    pub graphics: Queue,
    pub present: Queue,
}

impl Queues {
    pub(crate) fn new(device: &Device, family: QueueFamilySelection) -> Self {
        let graphics = unsafe { device.get_device_queue(family.graphics(), 0) };
        let present = unsafe { device.get_device_queue(family.present(), 0) };
        Self {
            family,
            graphics,
            present,
        }
    }
}
