pub mod capabilities;
pub mod debug;
pub mod entry;
pub mod instance;
pub mod logical_device;
pub mod queues;
pub mod real_device;
pub mod selector;
pub mod surface;
