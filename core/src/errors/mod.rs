mod future_error;

pub use future_error::FutureError;
