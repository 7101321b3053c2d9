pub mod inner;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
