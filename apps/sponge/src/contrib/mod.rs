//! # Contrib Controllers
//!
//! Controllers that ship with the framework: the image-serving handler and
//! the demo controllers the scaffold mounts. All of them register on
//! [`ControllerRegistry::with_builtins`](crate::bootstrap::ControllerRegistry::with_builtins).

mod controllers;
mod image;

pub use controllers::{AjaxController, HelloWorldController};
pub use image::{ImageHandler, PictureOptions, jpeg, picture};
