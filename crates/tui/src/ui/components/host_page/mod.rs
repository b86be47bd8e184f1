mod host_page_component;

pub use host_page_component::HostPageComponent;
