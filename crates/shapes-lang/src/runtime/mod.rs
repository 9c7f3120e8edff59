pub mod env;
pub mod interpreter;
pub mod scheduler;
pub mod stack;
pub mod value;
