pub mod credentials;
pub mod org_tree;
pub mod ping;
