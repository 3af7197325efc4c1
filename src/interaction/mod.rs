pub mod controller;
pub mod index;
pub mod ledger;
pub mod model;
pub mod service;
