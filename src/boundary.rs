pub mod forcing;
pub mod obstacle;
