pub mod neural_models;
pub mod profiles;
