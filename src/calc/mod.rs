pub mod aggregate;
pub mod autocalc;
pub mod cash;
pub mod payroll;
pub mod timespan;
