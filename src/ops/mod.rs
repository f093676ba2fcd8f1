pub mod board_ops;
pub mod collision;
pub mod position;
