pub mod detect;
pub mod health;
pub mod ui;

#[cfg(test)]
mod tests;
