pub mod line;

pub use line::LineCells;
