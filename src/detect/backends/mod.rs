pub mod stub;

#[cfg(feature = "backend-tract")]
pub mod tract;

pub use stub::{demo_scene, ScriptedDetection, StubBackend};

#[cfg(feature = "backend-tract")]
pub use tract::TractBackend;
