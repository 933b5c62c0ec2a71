use crate::gapi::vulkan::config::VulkanConfig;
use crate::gapi::vulkan::core::real_device::PhysicalDeviceCandidate;
use crate::gapi::vulkan::enums::extensions::DeviceExtension;
use crate::gapi::vulkan::errors::{NegotiationError, SuitabilityError};
use log::{debug, trace};
use vulkanalia::vk;

/// What a physical device must offer to be selected.
#[derive(Clone, Debug)]
pub struct DeviceRequirements {
    /// Packed API version, compared against `VkPhysicalDeviceProperties::apiVersion`.
    pub min_api_version: u32,
    pub extensions: Vec<DeviceExtension>,
}

impl From<&VulkanConfig> for DeviceRequirements {
    fn from(config: &VulkanConfig) -> Self {
        Self {
            min_api_version: config.min_api_version,
            extensions: config.device_extensions.clone(),
        }
    }
}

type SuitabilityCheck =
    fn(&PhysicalDeviceCandidate, &DeviceRequirements) -> Result<(), SuitabilityError>;

/// The suitability policy, evaluated in order; the first failing check rejects the candidate.
const SUITABILITY_CHECKS: [SuitabilityCheck; 4] = [
    check_api_version,
    check_graphics_queue,
    check_extensions,
    check_features,
];

/// Picks the first candidate, in enumeration order, that passes every suitability check.
///
/// There is no scoring: a later, "better" device never displaces an earlier conforming one.
///
/// # Errors
/// [`NegotiationError::NoSuitableDevice`] when the list is empty or nothing conforms. There is no
/// fallback tier, so this ends the session.
pub fn select_device(
    candidates: Vec<PhysicalDeviceCandidate>,
    requirements: &DeviceRequirements,
) -> Result<PhysicalDeviceCandidate, NegotiationError> {
    let count = candidates.len();
    debug!(
        "Picking physical device between available devices: {:?}.",
        candidates.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
    );
    candidates
        .into_iter()
        .find(|candidate| match check_candidate(candidate, requirements) {
            Ok(()) => {
                debug!("Selected physical device (`{}`).", candidate.name);
                true
            }
            Err(error) => {
                debug!("Skipping physical device (`{}`): {error}", candidate.name);
                false
            }
        })
        .ok_or(NegotiationError::NoSuitableDevice { candidates: count })
}

pub(crate) fn check_candidate(
    candidate: &PhysicalDeviceCandidate,
    requirements: &DeviceRequirements,
) -> Result<(), SuitabilityError> {
    trace!("Checking \"{}\"...", candidate.name);
    SUITABILITY_CHECKS
        .iter()
        .try_for_each(|check| check(candidate, requirements))
}

fn check_api_version(
    candidate: &PhysicalDeviceCandidate,
    requirements: &DeviceRequirements,
) -> Result<(), SuitabilityError> {
    if candidate.api_version >= requirements.min_api_version {
        Ok(())
    } else {
        Err(SuitabilityError(format!(
            "Vulkan {}.{} support (device reports {}.{})",
            vk::version_major(requirements.min_api_version),
            vk::version_minor(requirements.min_api_version),
            vk::version_major(candidate.api_version),
            vk::version_minor(candidate.api_version),
        )))
    }
}

fn check_graphics_queue(
    candidate: &PhysicalDeviceCandidate,
    _: &DeviceRequirements,
) -> Result<(), SuitabilityError> {
    candidate
        .queue_families
        .iter()
        .any(|family| family.queue_flags.contains(vk::QueueFlags::GRAPHICS))
        .then_some(())
        .ok_or_else(|| SuitabilityError("a graphics-capable queue family".into()))
}

fn check_extensions(
    candidate: &PhysicalDeviceCandidate,
    requirements: &DeviceRequirements,
) -> Result<(), SuitabilityError> {
    match requirements
        .extensions
        .iter()
        .find(|ext| !candidate.extensions.contains(&ext.name()))
    {
        Some(missing) => Err(SuitabilityError(format!("device extension {missing}"))),
        None => Ok(()),
    }
}

fn check_features(
    candidate: &PhysicalDeviceCandidate,
    _: &DeviceRequirements,
) -> Result<(), SuitabilityError> {
    if !candidate.features.dynamic_rendering {
        return Err(SuitabilityError("dynamic rendering support".into()));
    }
    if !candidate.features.extended_dynamic_state {
        return Err(SuitabilityError("extended dynamic state support".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gapi::vulkan::core::real_device::DeviceFeatures;
    use vulkanalia::vk::Handle;

    fn requirements() -> DeviceRequirements {
        DeviceRequirements {
            min_api_version: vk::make_version(1, 3, 0),
            extensions: vec![DeviceExtension::KhrSwapchain, DeviceExtension::KhrSpirv14],
        }
    }

    fn conforming(name: &str) -> PhysicalDeviceCandidate {
        PhysicalDeviceCandidate {
            handle: vk::PhysicalDevice::null(),
            name: name.to_string(),
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            api_version: vk::make_version(1, 3, 250),
            queue_families: vec![vk::QueueFamilyProperties {
                queue_flags: vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER,
                queue_count: 4,
                ..Default::default()
            }],
            extensions: ["VK_KHR_spirv_1_4", "VK_KHR_swapchain", "VK_KHR_maintenance5"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            features: DeviceFeatures {
                dynamic_rendering: true,
                extended_dynamic_state: true,
            },
        }
    }

    fn old_api(name: &str) -> PhysicalDeviceCandidate {
        PhysicalDeviceCandidate {
            api_version: vk::make_version(1, 2, 198),
            ..conforming(name)
        }
    }

    fn compute_only(name: &str) -> PhysicalDeviceCandidate {
        let mut candidate = conforming(name);
        candidate.queue_families[0].queue_flags = vk::QueueFlags::COMPUTE;
        candidate
    }

    fn missing_extension(name: &str) -> PhysicalDeviceCandidate {
        let mut candidate = conforming(name);
        candidate.extensions.remove("VK_KHR_spirv_1_4");
        candidate
    }

    fn no_dynamic_rendering(name: &str) -> PhysicalDeviceCandidate {
        let mut candidate = conforming(name);
        candidate.features.dynamic_rendering = false;
        candidate
    }

    fn no_extended_dynamic_state(name: &str) -> PhysicalDeviceCandidate {
        let mut candidate = conforming(name);
        candidate.features.extended_dynamic_state = false;
        candidate
    }

    #[test]
    fn single_conforming_candidate_wins_at_any_position() {
        let builders: [fn(&str) -> PhysicalDeviceCandidate; 5] = [
            old_api,
            compute_only,
            missing_extension,
            no_dynamic_rendering,
            no_extended_dynamic_state,
        ];
        for position in 0..=builders.len() {
            let mut candidates: Vec<_> = builders
                .iter()
                .enumerate()
                .map(|(i, build)| build(&format!("reject-{i}")))
                .collect();
            candidates.insert(position, conforming("chosen"));
            let selected = select_device(candidates, &requirements()).unwrap();
            assert_eq!(selected.name, "chosen", "conforming device at {position}");
        }
    }

    #[test]
    fn first_match_in_enumeration_order_wins() {
        let candidates = vec![
            no_dynamic_rendering("a"),
            conforming("b"),
            conforming("c"),
        ];
        assert_eq!(select_device(candidates, &requirements()).unwrap().name, "b");
    }

    #[test]
    fn all_missing_dynamic_rendering_is_no_suitable_device() {
        let candidates = vec![no_dynamic_rendering("a"), no_dynamic_rendering("b")];
        assert!(matches!(
            select_device(candidates, &requirements()),
            Err(NegotiationError::NoSuitableDevice { candidates: 2 })
        ));
    }

    #[test]
    fn empty_list_is_no_suitable_device() {
        assert!(matches!(
            select_device(Vec::new(), &requirements()),
            Err(NegotiationError::NoSuitableDevice { candidates: 0 })
        ));
    }

    #[test]
    fn extension_order_does_not_matter() {
        let mut reversed = requirements();
        reversed.extensions.reverse();
        assert!(check_candidate(&conforming("a"), &reversed).is_ok());
    }

    #[test]
    fn rejection_names_the_failed_check() {
        let error = check_candidate(&missing_extension("a"), &requirements()).unwrap_err();
        assert!(error.to_string().contains("VK_KHR_spirv_1_4"));

        let error = check_candidate(&old_api("a"), &requirements()).unwrap_err();
        assert!(error.to_string().contains("1.3"));

        let error = check_candidate(&no_extended_dynamic_state("a"), &requirements()).unwrap_err();
        assert!(error.to_string().contains("extended dynamic state"));
    }

    #[test]
    fn api_version_equal_to_minimum_is_accepted() {
        let candidate = PhysicalDeviceCandidate {
            api_version: vk::make_version(1, 3, 0),
            ..conforming("a")
        };
        assert!(check_candidate(&candidate, &requirements()).is_ok());
    }
}
