pub mod data_container;

pub use data_container::{DataContainer, DataContainerState, PropertyValue};
