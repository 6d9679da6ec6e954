pub mod action;
pub mod document;
pub mod history;
pub mod session;
pub mod tracker;

#[cfg(test)]
pub mod harness;
