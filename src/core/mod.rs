pub mod bass;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod error;
pub mod media;
pub mod particles;
pub mod presets;
pub mod scene;
pub mod scrub;

pub use bass::*;
pub use clock::*;
pub use compositor::*;
pub use config::SceneConfig;
pub use error::*;
pub use media::*;
pub use particles::*;
pub use presets::*;
pub use scene::*;
pub use scrub::*;
