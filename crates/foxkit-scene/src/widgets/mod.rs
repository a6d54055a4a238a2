//! The built-in widget set.

mod button;
mod label_box;
mod list_box;
mod list_container;
mod tab_bar;
mod text_box;

pub use button::Button;
pub use label_box::{LabelBox, TextAlign};
pub use list_box::ListBox;
pub use list_container::ListContainer;
pub use tab_bar::TabBar;
pub use text_box::TextBox;
