pub mod cell;
pub mod dataset;
pub mod edit;
pub mod view;
