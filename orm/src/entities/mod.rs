pub mod wallet;
pub mod points;
pub mod crowdfunding;

// Re-export all entities
pub use wallet::*;
pub use points::*;
pub use crowdfunding::*;
