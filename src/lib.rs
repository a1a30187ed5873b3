pub mod android_jni;
pub mod geo;
pub mod gpx;
pub mod nav;

pub use geo::GeoPoint;
pub use nav::{locate, Instruction, NavigationProgress};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
