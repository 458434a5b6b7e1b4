pub mod board;
pub mod row;
