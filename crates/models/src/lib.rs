pub mod errors;
pub mod db;
pub mod slug;
pub mod admin;
pub mod client;
pub mod avis;

#[cfg(test)]
mod tests;
