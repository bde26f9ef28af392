pub mod check;
pub mod clean;
pub mod rules;
