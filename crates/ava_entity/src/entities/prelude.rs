pub use super::farm_job::Entity as FarmJob;
pub use super::farm_node::Entity as FarmNode;
pub use super::take::Entity as Take;
