use std::sync::Arc;

use crate::registry::NodeRegistry;

pub mod button;
pub mod carousel;
pub mod conditional;
pub mod container;
pub mod image;
pub mod lazy;
pub mod list;
pub mod text;
pub mod text_input;

pub use button::ButtonBuilder;
pub use carousel::CarouselBuilder;
pub use conditional::ConditionalBuilder;
pub use container::ContainerBuilder;
pub use image::ImageBuilder;
pub use lazy::LazyBuilder;
pub use list::ListBuilder;
pub use text::TextBuilder;
pub use text_input::TextInputBuilder;

pub fn register_builtins(registry: &mut NodeRegistry) {
    registry.register(Arc::new(TextBuilder));
    registry.register(Arc::new(ImageBuilder));
    registry.register(Arc::new(ContainerBuilder));
    registry.register(Arc::new(ButtonBuilder));
    registry.register(Arc::new(TextInputBuilder));
    registry.register(Arc::new(ListBuilder));
    registry.register(Arc::new(CarouselBuilder));
    registry.register(Arc::new(ConditionalBuilder));
    registry.register(Arc::new(LazyBuilder));
}
