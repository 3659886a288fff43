pub mod prelude;

pub mod farm_job;
pub mod farm_node;
pub mod take;
