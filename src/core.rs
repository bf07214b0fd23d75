pub mod board_view;
pub mod coords;
pub mod definitions;
