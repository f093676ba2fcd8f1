pub mod cli;
pub mod drag;
pub mod io;
pub mod model;
pub mod ops;
