/// Database access layer
///
/// - `executor`: placeholder compilation, bound execution, cardinality checks
/// - `*_repo`: the fixed statements behind each resource operation
pub mod attendee_repo;
pub mod executor;
pub mod post_repo;
pub mod restaurant_repo;
pub mod student_repo;

pub use executor::{
    Cardinality, CompiledStatement, Executor, Outcome, ParamValue, Params, QueryError, Statement,
};
