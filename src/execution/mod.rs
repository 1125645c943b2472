pub mod context;
pub mod dry_run;

pub use context::ExecutionContext;
pub use dry_run::DryRunExecutionContext;
