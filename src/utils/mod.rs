pub mod arch;
pub mod rpmparse;
