pub mod deploy;
pub mod outputs;
pub mod people;
pub mod process;
pub mod purge;
pub mod schemas;
pub mod status;
