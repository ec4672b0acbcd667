mod singleflight;

pub use singleflight::Singleflight;
