pub mod command;
pub mod lexer;
pub mod token;
