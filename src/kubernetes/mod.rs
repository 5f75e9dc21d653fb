pub mod credentials;
pub mod kubers;
pub mod model;

#[cfg(test)]
pub mod stubs;
