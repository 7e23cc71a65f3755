pub mod agent;
pub mod chat;
pub mod lookup;
pub mod tools;
