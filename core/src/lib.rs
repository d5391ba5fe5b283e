pub mod errors;
pub mod future;
pub mod scheduler;
pub mod value;

pub use errors::FutureError;
pub use future::{Deferred, Future, FutureState, Handler, SettleFn};
pub use scheduler::{Schedule, Scheduler, Task, TaskQueue};
pub use value::{FnThenable, ObjectValue, ThenMethod, Thenable, Value};
