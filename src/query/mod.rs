pub mod cycles;
pub mod unused;
