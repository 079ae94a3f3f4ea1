pub mod authorizedotnet;

pub use authorizedotnet::Authorizedotnet;
