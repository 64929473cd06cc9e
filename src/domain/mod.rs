pub mod change;
pub mod document;
pub mod pull_request;
pub mod reference;
pub mod repository;
pub mod scope;
pub mod ticket;
