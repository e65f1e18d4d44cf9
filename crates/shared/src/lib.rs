pub mod config;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod path;
pub mod registry;
pub mod render;
pub mod session;
pub mod transform;
pub mod viewer;

pub use config::MapConfig;
pub use dataset::{Dataset, Region};
pub use error::MapError;
pub use geometry::{Point, Rect};
pub use registry::DatasetRegistry;
pub use session::{MapEvent, MapSession};
pub use transform::ViewportTransform;
pub use viewer::{LoadOutcome, LoadTicket, MapViewer, ViewState};
