pub mod api;
pub mod contact;
pub mod layout;
pub mod model;
pub mod scroll;

#[cfg(not(target_arch = "wasm32"))]
pub mod backend;
#[cfg(target_arch = "wasm32")]
pub mod frontend;
