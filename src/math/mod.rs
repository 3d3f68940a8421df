mod angle;
mod dispatch;
mod hash;

pub use angle::{clamp, vertical_fov, wrap_angle};
pub use dispatch::{round_up_to_multiple, DispatchSize};
pub use hash::{hash_frame, splitmix_64, SeedStream};
