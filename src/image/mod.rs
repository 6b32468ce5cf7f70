pub mod buffer;
pub mod io;
pub mod plane;
pub mod sample;
pub mod traits;

pub use self::buffer::Image;
pub use self::plane::{ImageF32, ImageF64, Plane};
pub use self::sample::{Sample, WorkingFloat};
pub use self::traits::ImageView;
