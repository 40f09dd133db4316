pub mod inspector_panel;

pub use inspector_panel::InspectorPanel;
