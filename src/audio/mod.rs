pub mod aggregate;
pub mod analysis;
pub mod decode;
pub mod features;
pub mod spectral;
pub mod tempo;
pub mod window;
